//! Land-cover command - class composition of a rectangle.

use super::common::BoundsArgs;
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalOptions};

/// Run the land-cover command.
pub fn run(area: BoundsArgs, options: &GlobalOptions) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("land-cover");
    let engine = runner.create_engine();

    let composition = runner.block_on(engine.get_land_cover(area.bounds()))?;
    runner.print_json(&composition)
}
