//! Composite vegetation health at a point.

use super::combinators::CallPolicy;
use crate::backend::{BackendError, DataSource, ImageryBackend};
use crate::classify::Trend;
use crate::coord::{DateRange, GeoPoint};
use crate::indices::{health_alerts, health_score, leaf_area_index, rescale};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default lookback window, in months.
pub const DEFAULT_HEALTH_MONTHS: u32 = 6;

/// Vegetation health derived from the multi-month composite product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationHealth {
    pub index: f64,
    pub secondary_index: f64,
    pub leaf_area_index: f64,
    pub health_score: u8,
    /// Always [`Trend::Stable`]: no historical comparison is made here.
    /// Use the trend analysis for direction over time.
    pub trend: Trend,
    pub alerts: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub source: DataSource,
}

pub struct HealthAnalyzer<'a, B> {
    backend: &'a B,
    policy: &'a CallPolicy,
}

impl<'a, B: ImageryBackend> HealthAnalyzer<'a, B> {
    pub fn new(backend: &'a B, policy: &'a CallPolicy) -> Self {
        Self { backend, policy }
    }

    /// Analyzes the `months` ending on `today`.
    pub async fn analyze(
        &self,
        point: GeoPoint,
        months: u32,
        today: NaiveDate,
    ) -> Result<VegetationHealth, BackendError> {
        let range = DateRange::trailing_months(today, months);
        debug!(lat = point.lat, lng = point.lng, months, "Analyzing vegetation health");

        let composite = self
            .policy
            .run(self.backend.vegetation_composite(&point, &range))
            .await?;

        let index = rescale(composite.index);
        let secondary_index = rescale(composite.secondary_index);

        Ok(VegetationHealth {
            index,
            secondary_index,
            leaf_area_index: leaf_area_index(index),
            health_score: health_score(index, secondary_index),
            trend: Trend::Stable,
            alerts: health_alerts(index, secondary_index),
            timestamp: Utc::now(),
            source: self.backend.source(),
        })
    }
}
