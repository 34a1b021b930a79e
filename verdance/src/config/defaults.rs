//! Default values and constants for all configuration settings.
//!
//! Contains the `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use super::settings::*;
use crate::analysis::{
    DEFAULT_CALL_TIMEOUT, DEFAULT_HEALTH_MONTHS, DEFAULT_MAX_CLOUD_COVER_PCT, DEFAULT_TREND_YEARS,
};
use crate::engine::DEFAULT_RADIUS_M;

/// Default backend call timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = DEFAULT_CALL_TIMEOUT.as_secs();

/// Name of the log file inside the config directory.
pub const LOG_FILE_NAME: &str = "verdance.log";

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();

        Self {
            backend: BackendSettings {
                credentials_path: None,
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                cloud_cover_max_pct: DEFAULT_MAX_CLOUD_COVER_PCT,
            },
            analysis: AnalysisSettings {
                default_radius_m: DEFAULT_RADIUS_M,
                default_health_months: DEFAULT_HEALTH_MONTHS,
                default_trend_years: DEFAULT_TREND_YEARS,
            },
            simulation: SimulationSettings { seed: None },
            logging: LoggingSettings {
                file: config_dir.join(LOG_FILE_NAME),
            },
        }
    }
}
