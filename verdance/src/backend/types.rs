//! Backend types and traits

use crate::coord::{DateRange, GeoBounds, GeoPoint, QueryRegion};
use crate::indices::IndexStats;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by imagery backends.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Reduction produced no value (e.g. no imagery passed the filters)
    #[error("No data available: {0}")]
    MissingValue(String),

    /// Credentials artifact could not be read or parsed
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Call exceeded the configured timeout
    #[error("Backend call timed out after {0:?}")]
    Timeout(Duration),

    /// Call was cancelled before it completed
    #[error("Backend call cancelled")]
    Cancelled,
}

/// Which path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Remote imagery service
    Remote,
    /// Local simulation fallback
    Simulated,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Simulated => "simulated",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An index reduction request: region, window and quality filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexQuery {
    pub region: QueryRegion,
    pub range: DateRange,
    /// Frames with more obscured pixels than this percentage are excluded.
    pub max_cloud_cover_pct: f64,
}

/// Multi-month composite vegetation reading in product units
/// (scaled by [`crate::indices::PRODUCT_SCALE_FACTOR`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledComposite {
    pub index: f64,
    pub secondary_index: f64,
}

/// Volumetric soil moisture fractions averaged over a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoistureReading {
    pub surface: f64,
    pub root_zone: f64,
}

/// Area covered by one land-cover product code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassArea {
    pub code: i64,
    pub area_m2: f64,
}

/// Strategy interface over imagery sources.
///
/// Analyses are written against this trait only, so the same code runs
/// against the remote service and the simulation fallback.
pub trait ImageryBackend: Send + Sync {
    /// Reduces the normalized-difference index over the query region and
    /// window: mean, min, max and standard deviation.
    fn index_stats(
        &self,
        query: &IndexQuery,
    ) -> impl Future<Output = Result<IndexStats, BackendError>> + Send;

    /// Mean of the multi-month composite vegetation product at a point.
    fn vegetation_composite(
        &self,
        point: &GeoPoint,
        range: &DateRange,
    ) -> impl Future<Output = Result<ScaledComposite, BackendError>> + Send;

    /// Mean surface and root-zone soil moisture at a point.
    fn soil_moisture(
        &self,
        point: &GeoPoint,
        range: &DateRange,
    ) -> impl Future<Output = Result<MoistureReading, BackendError>> + Send;

    /// Area per modal land-cover code inside the rectangle.
    fn land_cover(
        &self,
        bounds: &GeoBounds,
        range: &DateRange,
    ) -> impl Future<Output = Result<Vec<ClassArea>, BackendError>> + Send;

    /// Label carried by results produced through this backend.
    fn source(&self) -> DataSource;

    /// Backend name for logging.
    fn name(&self) -> &str;
}
