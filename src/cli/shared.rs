use gbfeatures::feature::FeatureList;
use gbfeatures::feature_table::read_features;
use gbfeatures::writer::{Format, Writer};
use clap::Parser;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

pub const HELP_TEMPLATE: &str =
    "{name} v{version}\n{about}\n\n{usage-heading} {usage}\n\n{all-args}{after-help}";

#[derive(Parser, Debug)]
pub struct CommonArgs {
    #[arg(
        help = "GenBank file or bare FEATURES block (use - for stdin)",
        short = 'i',
        long = "input"
    )]
    pub input_path: PathBuf,

    #[arg(
        help = "output file (default: stdout)",
        short = 'o',
        long = "output",
        default_value = "-"
    )]
    pub output_path: PathBuf,

    #[arg(
        help = "output format for feature lists",
        long = "format",
        value_enum,
        default_value = "feature-table"
    )]
    pub format: Format,
}

impl CommonArgs {
    pub fn read_input(&self) -> io::Result<FeatureList> {
        let features = open_features(&self.input_path)?;
        log::info!(
            "read {} features from {}",
            features.len(),
            self.input_path.display()
        );
        Ok(features)
    }

    pub fn writer(&self) -> io::Result<Writer> {
        let path = self.output_path.to_str().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("output path is not valid UTF-8: {:?}", self.output_path),
            )
        })?;
        Writer::init(path, self.format)
    }
}

/// Read features from a path, or from stdin when the path is `-`.
pub fn open_features(path: &Path) -> io::Result<FeatureList> {
    if path.as_os_str() == "-" {
        read_features(io::stdin().lock())
    } else {
        read_features(File::open(path)?)
    }
}
