//! Moisture command - soil moisture and drought risk at a point.

use super::common::PointArgs;
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalOptions};

/// Run the moisture command.
pub fn run(location: PointArgs, options: &GlobalOptions) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("moisture");
    let engine = runner.create_engine();

    let moisture = runner.block_on(engine.get_soil_moisture(location.point()))?;
    runner.print_json(&moisture)
}
