//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Remote backend settings
    pub backend: BackendSettings,
    /// Analysis defaults
    pub analysis: AnalysisSettings,
    /// Simulated backend settings
    pub simulation: SimulationSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Remote backend configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendSettings {
    /// Credentials artifact location (None = environment, then config directory)
    pub credentials_path: Option<PathBuf>,
    /// Timeout for each backend call in seconds
    pub request_timeout_secs: u64,
    /// Per-frame cloud-cover threshold in percent
    pub cloud_cover_max_pct: f64,
}

/// Defaults applied when a request leaves a parameter unset.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub default_radius_m: f64,
    pub default_health_months: u32,
    pub default_trend_years: u32,
}

/// Simulated backend configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    /// Fixed seed for reproducible output (None = seeded from entropy)
    pub seed: Option<u64>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
