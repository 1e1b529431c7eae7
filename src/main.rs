mod cli {
    pub mod location;
    pub mod retrieve;
    pub mod select;
    pub mod shared;
    pub mod shift;
}

use clap::{Parser, Subcommand};
use cli::location::{location_command, LocationCmdArgs};
use cli::retrieve::{retrieve_command, RetrieveCmdArgs};
use cli::select::{select_command, SelectCmdArgs};
use cli::shared::HELP_TEMPLATE;
use cli::shift::{shift_command, ShiftCmdArgs};
use std::env;

#[derive(Parser, Debug)]
#[command(author, version, about = "GenBank feature locations, selection and retrieval", long_about=None, rename_all = "kebab-case", help_template = HELP_TEMPLATE, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse locations and print them in canonical form.
    Location(LocationCmdArgs),
    /// Keep the features that pass a filter.
    Select(SelectCmdArgs),
    /// Tabulate columns and qualifiers of features.
    Retrieve(RetrieveCmdArgs),
    /// Shift all feature locations by a fixed offset.
    Shift(ShiftCmdArgs),
}

#[cfg(feature = "mimalloc_allocator")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "gbfeatures=info");
    }
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("{:?}", cli);

    match cli.command {
        Commands::Location(args) => location_command(args),
        Commands::Select(args) => select_command(args),
        Commands::Retrieve(args) => retrieve_command(args),
        Commands::Shift(args) => shift_command(args),
    }
}
