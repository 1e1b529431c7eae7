use crate::cli::shared::HELP_TEMPLATE;
use clap::Parser;
use gbfeatures::position::Value;
use gbfeatures::writer::{Format, Writer};
use gbfeatures::{parse_location, replace_strand, shift};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "parse GenBank locations and print them in canonical form", long_about=None, rename_all = "kebab-case", help_template = HELP_TEMPLATE, arg_required_else_help = true)]
pub struct LocationCmdArgs {
    #[arg(help = "one or more location strings", required = true)]
    pub locations: Vec<String>,

    #[arg(
        help = "shift every coordinate by this many bases",
        short = 'd',
        long = "shift",
        allow_hyphen_values = true
    )]
    pub shift: Option<i64>,

    #[arg(help = "set the strand of every segment (+, -, or NA)", long = "strand")]
    pub strand: Option<String>,

    #[arg(
        help = "print one start/end/width/strand line per segment",
        short = 'r',
        long = "ranges"
    )]
    pub ranges: bool,

    #[arg(
        help = "output file (default: stdout)",
        short = 'o',
        long = "output",
        default_value = "-"
    )]
    pub output_path: PathBuf,
}

pub fn location_command(args: LocationCmdArgs) -> Result<(), Box<dyn std::error::Error>> {
    let path = args
        .output_path
        .to_str()
        .ok_or("output path is not valid UTF-8")?;
    let mut output = Writer::init(path, Format::Tsv)?;
    for text in &args.locations {
        let mut location = parse_location(text)?;
        if let Some(d) = args.shift {
            location = shift(&location, &Value::from(d))?;
        }
        if let Some(s) = &args.strand {
            location = replace_strand(&location, &Value::from(s.as_str()))?;
        }
        output.write_location(&location, args.ranges)?;
    }
    output.flush()?;
    Ok(())
}
