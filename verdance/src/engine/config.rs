//! Engine configuration types.

use crate::analysis::{
    DEFAULT_CALL_TIMEOUT, DEFAULT_HEALTH_MONTHS, DEFAULT_MAX_CLOUD_COVER_PCT, DEFAULT_TREND_YEARS,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default buffer radius around a point, in metres.
pub const DEFAULT_RADIUS_M: f64 = 500.0;

/// Configuration for [`super::VegetationEngine`].
///
/// # Example
///
/// ```
/// use verdance::engine::EngineConfig;
/// use std::time::Duration;
///
/// let config = EngineConfig::builder()
///     .request_timeout(Duration::from_secs(10))
///     .simulation_seed(42)
///     .build();
///
/// assert_eq!(config.request_timeout(), Duration::from_secs(10));
/// assert_eq!(config.simulation_seed(), Some(42));
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Explicit credentials artifact location
    credentials_path: Option<PathBuf>,
    /// Bound on every backend call
    request_timeout: Duration,
    /// Per-frame obscured-pixel threshold for index queries
    cloud_cover_max_pct: f64,
    /// Seed for reproducible simulated output
    simulation_seed: Option<u64>,
    default_radius_m: f64,
    default_health_months: u32,
    default_trend_years: u32,
}

impl EngineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Explicit credentials path, if one was configured.
    ///
    /// When `None` the engine falls back to the environment and then the
    /// config directory.
    pub fn credentials_path(&self) -> Option<&Path> {
        self.credentials_path.as_deref()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn cloud_cover_max_pct(&self) -> f64 {
        self.cloud_cover_max_pct
    }

    pub fn simulation_seed(&self) -> Option<u64> {
        self.simulation_seed
    }

    pub fn default_radius_m(&self) -> f64 {
        self.default_radius_m
    }

    pub fn default_health_months(&self) -> u32 {
        self.default_health_months
    }

    pub fn default_trend_years(&self) -> u32 {
        self.default_trend_years
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfigBuilder::default().build()
    }
}

/// Builder for EngineConfig.
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    credentials_path: Option<PathBuf>,
    request_timeout: Option<Duration>,
    cloud_cover_max_pct: Option<f64>,
    simulation_seed: Option<u64>,
    default_radius_m: Option<f64>,
    default_health_months: Option<u32>,
    default_trend_years: Option<u32>,
}

impl EngineConfigBuilder {
    /// Set the credentials artifact location.
    pub fn credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Set the timeout applied to every backend call.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the per-frame cloud-cover threshold in percent.
    pub fn cloud_cover_max_pct(mut self, pct: f64) -> Self {
        self.cloud_cover_max_pct = Some(pct);
        self
    }

    /// Seed the simulated backend.
    pub fn simulation_seed(mut self, seed: u64) -> Self {
        self.simulation_seed = Some(seed);
        self
    }

    pub fn default_radius_m(mut self, radius_m: f64) -> Self {
        self.default_radius_m = Some(radius_m);
        self
    }

    pub fn default_health_months(mut self, months: u32) -> Self {
        self.default_health_months = Some(months);
        self
    }

    pub fn default_trend_years(mut self, years: u32) -> Self {
        self.default_trend_years = Some(years);
        self
    }

    /// Build the configuration with defaults for unset values.
    pub fn build(self) -> EngineConfig {
        EngineConfig {
            credentials_path: self.credentials_path,
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_CALL_TIMEOUT),
            cloud_cover_max_pct: self
                .cloud_cover_max_pct
                .unwrap_or(DEFAULT_MAX_CLOUD_COVER_PCT),
            simulation_seed: self.simulation_seed,
            default_radius_m: self.default_radius_m.unwrap_or(DEFAULT_RADIUS_M),
            default_health_months: self.default_health_months.unwrap_or(DEFAULT_HEALTH_MONTHS),
            default_trend_years: self.default_trend_years.unwrap_or(DEFAULT_TREND_YEARS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.credentials_path().is_none());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.cloud_cover_max_pct(), 20.0);
        assert_eq!(config.default_radius_m(), 500.0);
        assert_eq!(config.default_health_months(), 6);
        assert_eq!(config.default_trend_years(), 2);
        assert_eq!(config.simulation_seed(), None);
    }

    #[test]
    fn test_builder_overrides() {
        let config = EngineConfig::builder()
            .credentials_path("/etc/verdance/creds.json")
            .cloud_cover_max_pct(35.0)
            .default_radius_m(1_000.0)
            .default_health_months(12)
            .default_trend_years(4)
            .build();

        assert_eq!(
            config.credentials_path(),
            Some(Path::new("/etc/verdance/creds.json"))
        );
        assert_eq!(config.cloud_cover_max_pct(), 35.0);
        assert_eq!(config.default_radius_m(), 1_000.0);
        assert_eq!(config.default_health_months(), 12);
        assert_eq!(config.default_trend_years(), 4);
    }
}
