//! Verdance CLI - Command-line interface
//!
//! This binary provides a command-line interface to the Verdance library.
//! Every analysis prints its result as pretty JSON on stdout.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::assess::AssessArgs;
use commands::common::{BoundsArgs, PointArgs};
use commands::config::ConfigCommands;
use commands::health::HealthArgs;
use commands::index::IndexArgs;
use commands::trend::TrendArgs;
use error::CliError;
use runner::GlobalOptions;

#[derive(Parser)]
#[command(name = "verdance")]
#[command(version = verdance::VERSION)]
#[command(about = "Vegetation, soil moisture and land-cover intelligence", long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    debug: bool,

    /// Use this config file instead of ~/.verdance/config.ini
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether credentials are present and which mode is active
    Status,

    /// Vegetation index statistics around a point or inside a rectangle
    Index(IndexArgs),

    /// Composite vegetation health at a point
    Health(HealthArgs),

    /// Soil moisture and drought risk at a point
    Moisture(PointArgs),

    /// Land-cover composition of a rectangle
    LandCover(BoundsArgs),

    /// Quarterly index history and its direction
    Trend(TrendArgs),

    /// Sustainability assessment combining index, health and moisture
    Assess(AssessArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let options = GlobalOptions {
        debug: cli.debug,
        config: cli.config,
    };

    if let Err(e) = run(cli.command, &options) {
        e.exit();
    }
}

fn run(command: Commands, options: &GlobalOptions) -> Result<(), CliError> {
    match command {
        Commands::Status => commands::status::run(options),
        Commands::Index(args) => commands::index::run(args, options),
        Commands::Health(args) => commands::health::run(args, options),
        Commands::Moisture(location) => commands::moisture::run(location, options),
        Commands::LandCover(area) => commands::land_cover::run(area, options),
        Commands::Trend(args) => commands::trend::run(args, options),
        Commands::Assess(args) => commands::assess::run(args, options),
        Commands::Config { command } => commands::config::run(command, options),
    }
}
