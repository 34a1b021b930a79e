//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use verdance::backend::CREDENTIALS_ENV_VAR;
use verdance::config::ConfigFileError;
use verdance::error::EngineError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Invalid command-line argument
    InvalidArgument(String),
    /// An analysis failed
    Engine(EngineError),
    /// Failed to render the result
    Output(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Engine(EngineError::Initialization(_)) => {
                eprintln!();
                eprintln!("The remote imagery service could not be initialized. Check that:");
                eprintln!("  1. The credentials file is valid JSON with project_id, client_email and private_key");
                eprintln!("  2. The service endpoint is reachable from this machine");
                eprintln!(
                    "  3. {} or [backend] credentials points at the right file",
                    CREDENTIALS_ENV_VAR
                );
                eprintln!();
                eprintln!("Remove the credentials file to run in demo mode with simulated data.");
            }
            CliError::Engine(EngineError::Unauthenticated) => {
                eprintln!();
                eprintln!("Pass --subject <name> to identify who is requesting the assessment.");
            }
            CliError::Engine(EngineError::Backend(_)) => {
                eprintln!();
                eprintln!("Try again, or raise request_timeout in the [backend] section of config.ini.");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Run 'verdance config show' to see the active settings.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Engine(e) => write!(f, "{}", e),
            CliError::Output(e) => write!(f, "Failed to render output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::Engine(e) => Some(e),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        CliError::Engine(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}
