//! Health command - composite vegetation health at a point.

use clap::Args;

use super::common::PointArgs;
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalOptions};

/// Arguments for the health command.
#[derive(Debug, Args)]
pub struct HealthArgs {
    #[command(flatten)]
    pub location: PointArgs,

    /// Trailing window in months (default from config)
    #[arg(long)]
    pub months: Option<u32>,
}

/// Run the health command.
pub fn run(args: HealthArgs, options: &GlobalOptions) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("health");
    let engine = runner.create_engine();

    let health =
        runner.block_on(engine.get_vegetation_health(args.location.point(), args.months))?;
    runner.print_json(&health)
}
