//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, engine creation and
//! result output to reduce duplication across command handlers.

use crate::error::CliError;
use serde::Serialize;
use std::future::Future;
use std::path::Path;
use tokio::runtime::Runtime;
use tracing::info;
use verdance::config::ConfigFile;
use verdance::engine::VegetationEngine;
use verdance::logging::{init_logging, LoggingGuard};

/// Options shared by every analysis command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable debug logging to stderr
    pub debug: bool,
    /// Alternate config file
    pub config: Option<std::path::PathBuf>,
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
    runtime: Runtime,
}

impl CliRunner {
    /// Create a runner, loading config and initializing logging.
    pub fn new(options: &GlobalOptions) -> Result<Self, CliError> {
        let config = load_config(options.config.as_deref())?;

        let logging_guard = init_logging(&config.logging.file, options.debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = Runtime::new().map_err(CliError::Runtime)?;

        Ok(Self {
            logging_guard,
            config,
            runtime,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Verdance v{}", verdance::VERSION);
        info!("Verdance CLI: {} command", command);
    }

    /// Create an engine from the loaded configuration.
    pub fn create_engine(&self) -> VegetationEngine {
        VegetationEngine::new(self.config.to_engine_config())
    }

    /// Run a future to completion on the runner's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Print a result as pretty JSON on stdout.
    pub fn print_json<T: Serialize>(&self, value: &T) -> Result<(), CliError> {
        println!("{}", render_json(value)?);
        Ok(())
    }
}

/// Load the config file at `path`, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            ConfigFile::load_from(path)?
        }
        None => ConfigFile::load()?,
    };
    Ok(config)
}

pub fn render_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}
