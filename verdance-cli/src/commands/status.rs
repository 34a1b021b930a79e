//! Status command - report credentials presence and operating mode.

use crate::error::CliError;
use crate::runner::{CliRunner, GlobalOptions};

/// Run the status command.
///
/// Never initializes the backend.
pub fn run(options: &GlobalOptions) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("status");

    let engine = runner.create_engine();
    runner.print_json(&engine.get_status())
}
