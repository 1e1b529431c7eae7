use crate::cli::shared::{CommonArgs, HELP_TEMPLATE};
use clap::Parser;
use gbfeatures::{retrieve, select};

#[derive(Parser, Debug)]
#[command(author, version, about = "tabulate feature columns and qualifiers", long_about=None, rename_all = "kebab-case", help_template = HELP_TEMPLATE, arg_required_else_help = true)]
pub struct RetrieveCmdArgs {
    #[command(flatten)]
    pub common_args: CommonArgs,

    #[arg(help = "optional filter applied before retrieval", short = 'f', long = "filter")]
    pub filter: Option<String>,

    #[arg(
        help = "columns such as 'idx;key;range;gene;db_xref'. An empty list writes the features themselves",
        short = 'c',
        long = "columns"
    )]
    pub columns: String,
}

pub fn retrieve_command(args: RetrieveCmdArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut features = args.common_args.read_input()?;
    if let Some(filter) = &args.filter {
        features = select(&features, filter)?;
    }
    let retrieved = retrieve(&features, &args.columns)?;
    if retrieved.is_grouped() {
        log::debug!("some columns have several values per feature; writing one row per value");
    }

    let mut output = args.common_args.writer()?;
    output.write_retrieved(retrieved, args.columns.trim())?;
    output.flush()?;
    Ok(())
}
