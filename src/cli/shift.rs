use crate::cli::shared::{CommonArgs, HELP_TEMPLATE};
use clap::Parser;
use gbfeatures::{FeatureList, ShiftHook};

#[derive(Parser, Debug)]
#[command(author, version, about = "shift every feature location by a fixed offset", long_about=None, rename_all = "kebab-case", help_template = HELP_TEMPLATE, arg_required_else_help = true)]
pub struct ShiftCmdArgs {
    #[command(flatten)]
    pub common_args: CommonArgs,

    #[arg(
        help = "number of bases to add to every coordinate (may be negative)",
        short = 'd',
        long = "delta",
        allow_hyphen_values = true
    )]
    pub delta: i64,
}

/// Reports features whose span moved below position 1.
struct OriginCheck;

impl ShiftHook for OriginCheck {
    fn after_shift(&self, _before: &FeatureList, after: &FeatureList, delta: i64) {
        let below = after.iter().filter(|f| f.span().0 < 1).count();
        if below > 0 {
            log::warn!(
                "{} features start before position 1 after shifting by {}",
                below,
                delta
            );
        }
    }
}

pub fn shift_command(args: ShiftCmdArgs) -> Result<(), Box<dyn std::error::Error>> {
    let features = args.common_args.read_input()?;
    let shifted = features.shift(args.delta, Some(&OriginCheck))?;

    let mut output = args.common_args.writer()?;
    output.write_features(&shifted)?;
    output.flush()?;
    Ok(())
}
