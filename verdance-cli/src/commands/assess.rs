//! Assess command - combined sustainability assessment.

use clap::Args;
use verdance::engine::Caller;

use super::common::PointArgs;
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalOptions};

/// Arguments for the assess command.
#[derive(Debug, Args)]
pub struct AssessArgs {
    #[command(flatten)]
    pub location: PointArgs,

    /// Identity of the requester; assessments are refused without one
    #[arg(long)]
    pub subject: Option<String>,
}

impl AssessArgs {
    fn caller(&self) -> Caller {
        match &self.subject {
            Some(subject) if !subject.trim().is_empty() => Caller::authenticated(subject.trim()),
            _ => Caller::Anonymous,
        }
    }
}

/// Run the assess command.
pub fn run(args: AssessArgs, options: &GlobalOptions) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("assess");
    let engine = runner.create_engine();

    let assessment = runner.block_on(
        engine.get_sustainability_assessment(&args.caller(), args.location.point()),
    )?;
    runner.print_json(&assessment)
}
