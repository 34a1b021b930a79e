//! Verdance - vegetation and soil intelligence from satellite imagery
//!
//! This library answers questions about a location on the ground: how green
//! it is, how healthy the canopy looks, how wet the soil is, what covers the
//! land, and which way things are heading. Results come from a remote
//! imagery service when credentials are configured and from a deterministic
//! simulation otherwise, with the same shapes either way.
//!
//! # High-Level API
//!
//! The [`engine`] module provides the facade:
//!
//! ```ignore
//! use verdance::config::ConfigFile;
//! use verdance::coord::GeoPoint;
//! use verdance::engine::VegetationEngine;
//!
//! let engine = VegetationEngine::new(ConfigFile::load()?.to_engine_config());
//!
//! let point = GeoPoint::new(-27.47, 153.02)?;
//! let health = engine.get_vegetation_health(point, None).await?;
//! println!("health score {}", health.health_score);
//! ```

pub mod analysis;
pub mod backend;
pub mod classify;
pub mod config;
pub mod coord;
pub mod engine;
pub mod error;
pub mod gate;
pub mod indices;
pub mod logging;

/// Version of the Verdance library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
