//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::coord::{validate_months, validate_radius, validate_years};

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [backend] section
    if let Some(section) = ini.section(Some("backend")) {
        if let Some(v) = section.get("credentials") {
            let v = v.trim();
            if !v.is_empty() {
                config.backend.credentials_path = Some(expand_tilde(v));
            }
        }
        if let Some(v) = section.get("request_timeout") {
            let secs: u64 = parse_number("backend", "request_timeout", v)?;
            if secs == 0 {
                return Err(invalid(
                    "backend",
                    "request_timeout",
                    v,
                    "must be at least 1 second",
                ));
            }
            config.backend.request_timeout_secs = secs;
        }
        if let Some(v) = section.get("cloud_cover_max") {
            let pct: f64 = parse_number("backend", "cloud_cover_max", v)?;
            if !(0.0..=100.0).contains(&pct) {
                return Err(invalid(
                    "backend",
                    "cloud_cover_max",
                    v,
                    "must be between 0 and 100",
                ));
            }
            config.backend.cloud_cover_max_pct = pct;
        }
    }

    // [analysis] section
    if let Some(section) = ini.section(Some("analysis")) {
        if let Some(v) = section.get("radius") {
            let radius: f64 = parse_number("analysis", "radius", v)?;
            config.analysis.default_radius_m = validate_radius(radius)
                .map_err(|e| invalid("analysis", "radius", v, &e.to_string()))?;
        }
        if let Some(v) = section.get("health_months") {
            let months: u32 = parse_number("analysis", "health_months", v)?;
            config.analysis.default_health_months = validate_months(months)
                .map_err(|e| invalid("analysis", "health_months", v, &e.to_string()))?;
        }
        if let Some(v) = section.get("trend_years") {
            let years: u32 = parse_number("analysis", "trend_years", v)?;
            config.analysis.default_trend_years = validate_years(years)
                .map_err(|e| invalid("analysis", "trend_years", v, &e.to_string()))?;
        }
    }

    // [simulation] section
    if let Some(section) = ini.section(Some("simulation")) {
        if let Some(v) = section.get("seed") {
            let v = v.trim();
            if !v.is_empty() {
                config.simulation.seed = Some(parse_number("simulation", "seed", v)?);
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a number"))
}

/// Expand `~/` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;

    fn parse(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(content).unwrap();
        parse_ini(&ini)
    }

    #[test]
    fn test_empty_ini_yields_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, ConfigFile::default());
        assert_eq!(
            config.backend.request_timeout_secs,
            DEFAULT_REQUEST_TIMEOUT_SECS
        );
    }

    #[test]
    fn test_parse_all_sections() {
        let config = parse(
            r#"
[backend]
credentials = /srv/verdance/credentials.json
request_timeout = 12
cloud_cover_max = 35.5

[analysis]
radius = 2500
health_months = 12
trend_years = 3

[simulation]
seed = 99

[logging]
file = /var/log/verdance.log
"#,
        )
        .unwrap();

        assert_eq!(
            config.backend.credentials_path,
            Some(PathBuf::from("/srv/verdance/credentials.json"))
        );
        assert_eq!(config.backend.request_timeout_secs, 12);
        assert_eq!(config.backend.cloud_cover_max_pct, 35.5);
        assert_eq!(config.analysis.default_radius_m, 2500.0);
        assert_eq!(config.analysis.default_health_months, 12);
        assert_eq!(config.analysis.default_trend_years, 3);
        assert_eq!(config.simulation.seed, Some(99));
        assert_eq!(config.logging.file, PathBuf::from("/var/log/verdance.log"));
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = parse("[backend]\ncredentials =\n[simulation]\nseed =\n").unwrap();
        assert!(config.backend.credentials_path.is_none());
        assert!(config.simulation.seed.is_none());
    }

    #[test]
    fn test_radius_out_of_range() {
        let err = parse("[analysis]\nradius = 50\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue {
                section,
                key,
                value,
                ..
            } => {
                assert_eq!(section, "analysis");
                assert_eq!(key, "radius");
                assert_eq!(value, "50");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejected_values() {
        for content in [
            "[backend]\nrequest_timeout = 0\n",
            "[backend]\nrequest_timeout = soon\n",
            "[backend]\ncloud_cover_max = 120\n",
            "[analysis]\nhealth_months = 30\n",
            "[analysis]\ntrend_years = 0\n",
            "[simulation]\nseed = -1\n",
        ] {
            assert!(
                matches!(parse(content), Err(ConfigFileError::InvalidValue { .. })),
                "accepted: {content}"
            );
        }
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/test/path");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("test/path"));
        }

        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }
}
