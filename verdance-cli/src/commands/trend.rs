//! Trend command - quarterly index history and its direction.

use clap::Args;

use super::common::PointArgs;
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalOptions};

/// Arguments for the trend command.
#[derive(Debug, Args)]
pub struct TrendArgs {
    #[command(flatten)]
    pub location: PointArgs,

    /// Years of history (default from config)
    #[arg(long)]
    pub years: Option<u32>,
}

/// Run the trend command.
pub fn run(args: TrendArgs, options: &GlobalOptions) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("trend");
    let engine = runner.create_engine();

    let series = runner.block_on(engine.get_trend(args.location.point(), args.years))?;
    if series.skipped() > 0 {
        eprintln!(
            "Note: {} of {} samples were unavailable and skipped",
            series.skipped(),
            series.requested
        );
    }
    runner.print_json(&series)
}
