//! Composite sustainability assessment.

use super::combinators::{all_or_nothing, CallPolicy};
use super::health::{HealthAnalyzer, VegetationHealth, DEFAULT_HEALTH_MONTHS};
use super::index::{IndexCalculator, IndexResult};
use super::moisture::{MoistureAnalyzer, SoilMoisture};
use crate::backend::{BackendError, DataSource, ImageryBackend};
use crate::coord::{GeoPoint, QueryRegion};
use crate::indices::{recommendations, sustainability_score};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityAssessment {
    pub index: IndexResult,
    pub health: VegetationHealth,
    pub moisture: SoilMoisture,
    pub score: u8,
    pub recommendations: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub source: DataSource,
}

/// Runs the index, health and moisture analyses together and combines them.
///
/// All three must succeed; there is no partial assessment.
pub struct SustainabilityAggregator<'a, B> {
    backend: &'a B,
    policy: &'a CallPolicy,
    radius_m: f64,
    max_cloud_cover_pct: f64,
}

impl<'a, B: ImageryBackend> SustainabilityAggregator<'a, B> {
    pub fn new(backend: &'a B, policy: &'a CallPolicy, radius_m: f64) -> Self {
        Self {
            backend,
            policy,
            radius_m,
            max_cloud_cover_pct: super::index::DEFAULT_MAX_CLOUD_COVER_PCT,
        }
    }

    pub fn with_max_cloud_cover(mut self, pct: f64) -> Self {
        self.max_cloud_cover_pct = pct;
        self
    }

    /// Assesses `point` as of `today`.
    ///
    /// The first failing sub-analysis fails the assessment and cancels the
    /// other two.
    pub async fn assess(
        &self,
        point: GeoPoint,
        today: NaiveDate,
    ) -> Result<SustainabilityAssessment, BackendError> {
        let calculator = IndexCalculator::new(self.backend, self.policy)
            .with_max_cloud_cover(self.max_cloud_cover_pct);
        let health_analyzer = HealthAnalyzer::new(self.backend, self.policy);
        let moisture_analyzer = MoistureAnalyzer::new(self.backend, self.policy);

        debug!(lat = point.lat, lng = point.lng, "Assessing sustainability");

        let (index, health, moisture) = all_or_nothing(
            calculator.compute_recent(QueryRegion::buffer(point, self.radius_m), today),
            health_analyzer.analyze(point, DEFAULT_HEALTH_MONTHS, today),
            moisture_analyzer.analyze(point, today),
        )
        .await?;

        let score = sustainability_score(index.mean, health.health_score, moisture.drought_risk);
        let recommendations = recommendations(
            index.category,
            moisture.drought_risk,
            moisture.moisture_category,
            &health.alerts,
        );

        Ok(SustainabilityAssessment {
            index,
            health,
            moisture,
            score,
            recommendations,
            timestamp: Utc::now(),
            source: self.backend.source(),
        })
    }
}
