use crate::cli::shared::{CommonArgs, HELP_TEMPLATE};
use clap::Parser;
use gbfeatures::select::Filter;

#[derive(Parser, Debug)]
#[command(author, version, about = "keep the features that pass a filter", long_about=None, rename_all = "kebab-case", help_template = HELP_TEMPLATE, arg_required_else_help = true)]
pub struct SelectCmdArgs {
    #[command(flatten)]
    pub common_args: CommonArgs,

    #[arg(
        help = "filter such as 'key=CDS; loc=100:2000; gene=abc'. Clauses are applied in order index, loc, key, qualifiers",
        short = 'f',
        long = "filter"
    )]
    pub filter: String,
}

pub fn select_command(args: SelectCmdArgs) -> Result<(), Box<dyn std::error::Error>> {
    let filter = Filter::parse(&args.filter)?;
    let features = args.common_args.read_input()?;
    let selected = filter.apply(&features);
    log::info!("selected {} of {} features", selected.len(), features.len());

    let mut output = args.common_args.writer()?;
    output.write_features(&selected)?;
    output.flush()?;
    Ok(())
}
