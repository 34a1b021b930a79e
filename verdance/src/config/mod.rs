//! User configuration stored in `~/.verdance/config.ini`.
//!
//! [`ConfigFile`] is the on-disk form with one struct per INI section.
//! [`ConfigFile::to_engine_config`] turns it into the
//! [`EngineConfig`](crate::engine::EngineConfig) the engine runs with.
//!
//! # Example
//!
//! ```no_run
//! use verdance::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let engine_config = config.to_engine_config();
//! # Ok::<(), verdance::config::ConfigFileError>(())
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{DEFAULT_REQUEST_TIMEOUT_SECS, LOG_FILE_NAME};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    AnalysisSettings, BackendSettings, ConfigFile, LoggingSettings, SimulationSettings,
};
