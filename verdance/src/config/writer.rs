//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let credentials = config
        .backend
        .credentials_path
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    let seed = config
        .simulation
        .seed
        .map(|s| s.to_string())
        .unwrap_or_default();

    format!(
        r#"; Verdance configuration
; Generated automatically - edit as needed

[backend]
; Credentials file for the remote imagery service.
; Leave empty to use $VERDANCE_CREDENTIALS, then ~/.verdance/credentials.json.
; Without credentials every analysis runs against simulated data.
credentials = {}
; Timeout for each backend call in seconds
request_timeout = {}
; Maximum cloud cover per image in percent (0-100)
cloud_cover_max = {}

[analysis]
; Buffer radius around a point in metres (100-10000)
radius = {}
; Trailing window for vegetation health in months (1-24)
health_months = {}
; Trend history in years (1-5)
trend_years = {}

[simulation]
; Fixed seed for reproducible simulated output (empty = random)
seed = {}

[logging]
; Log file path (default: ~/.verdance/verdance.log)
file = {}
"#,
        credentials,
        config.backend.request_timeout_secs,
        config.backend.cloud_cover_max_pct,
        config.analysis.default_radius_m,
        config.analysis.default_health_months,
        config.analysis.default_trend_years,
        seed,
        path_to_string(&config.logging.file),
    )
}

/// Render a path, collapsing the home directory back to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
