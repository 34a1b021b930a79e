//! Vegetation index statistics over an area.

use super::combinators::CallPolicy;
use crate::backend::{BackendError, DataSource, ImageryBackend, IndexQuery};
use crate::classify::{categorize_index, VegetationCategory};
use crate::coord::{DateRange, QueryRegion};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default trailing window for index queries, in days.
pub const DEFAULT_INDEX_WINDOW_DAYS: u32 = 30;

/// Default maximum obscured-pixel percentage per frame.
pub const DEFAULT_MAX_CLOUD_COVER_PCT: f64 = 20.0;

/// Index statistics with their category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexResult {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub category: VegetationCategory,
    pub timestamp: DateTime<Utc>,
    pub source: DataSource,
}

/// Computes [`IndexResult`]s through a backend.
pub struct IndexCalculator<'a, B> {
    backend: &'a B,
    policy: &'a CallPolicy,
    max_cloud_cover_pct: f64,
}

impl<'a, B: ImageryBackend> IndexCalculator<'a, B> {
    pub fn new(backend: &'a B, policy: &'a CallPolicy) -> Self {
        Self {
            backend,
            policy,
            max_cloud_cover_pct: DEFAULT_MAX_CLOUD_COVER_PCT,
        }
    }

    /// Sets the per-frame cloud-cover threshold.
    pub fn with_max_cloud_cover(mut self, pct: f64) -> Self {
        self.max_cloud_cover_pct = pct;
        self
    }

    /// Label of the backend results are computed through.
    pub fn source(&self) -> DataSource {
        self.backend.source()
    }

    /// Reduces the index over `region` and `range`.
    ///
    /// Backend errors propagate unchanged.
    pub async fn compute(
        &self,
        region: QueryRegion,
        range: DateRange,
    ) -> Result<IndexResult, BackendError> {
        let query = IndexQuery {
            region,
            range,
            max_cloud_cover_pct: self.max_cloud_cover_pct,
        };
        debug!(
            backend = self.backend.name(),
            start = %range.start,
            end = %range.end,
            "Computing index statistics"
        );

        let stats = self.policy.run(self.backend.index_stats(&query)).await?;

        Ok(IndexResult {
            mean: stats.mean,
            min: stats.min,
            max: stats.max,
            std_dev: stats.std_dev,
            category: categorize_index(stats.mean),
            timestamp: Utc::now(),
            source: self.backend.source(),
        })
    }

    /// Like [`compute`](Self::compute) over the default trailing window ending
    /// on `today`.
    pub async fn compute_recent(
        &self,
        region: QueryRegion,
        today: NaiveDate,
    ) -> Result<IndexResult, BackendError> {
        let range = DateRange::trailing_days(today, DEFAULT_INDEX_WINDOW_DAYS);
        self.compute(region, range).await
    }
}
