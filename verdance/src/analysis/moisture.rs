//! Soil moisture and drought risk at a point.

use super::combinators::CallPolicy;
use crate::backend::{BackendError, DataSource, ImageryBackend};
use crate::classify::{categorize_moisture, drought_risk, DroughtRisk, MoistureCategory};
use crate::coord::{DateRange, GeoPoint};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Trailing window averaged for moisture readings, in days.
pub const MOISTURE_WINDOW_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilMoisture {
    pub surface_moisture: f64,
    pub root_zone_moisture: f64,
    pub moisture_category: MoistureCategory,
    pub drought_risk: DroughtRisk,
    pub timestamp: DateTime<Utc>,
    pub source: DataSource,
}

pub struct MoistureAnalyzer<'a, B> {
    backend: &'a B,
    policy: &'a CallPolicy,
}

impl<'a, B: ImageryBackend> MoistureAnalyzer<'a, B> {
    pub fn new(backend: &'a B, policy: &'a CallPolicy) -> Self {
        Self { backend, policy }
    }

    /// Averages the 30 days ending on `today` and classifies the result.
    pub async fn analyze(&self, point: GeoPoint, today: NaiveDate) -> Result<SoilMoisture, BackendError> {
        let range = DateRange::trailing_days(today, MOISTURE_WINDOW_DAYS);
        debug!(lat = point.lat, lng = point.lng, "Analyzing soil moisture");

        let reading = self
            .policy
            .run(self.backend.soil_moisture(&point, &range))
            .await?;

        // Volumetric fractions; product noise can step slightly outside.
        let surface = reading.surface.clamp(0.0, 1.0);
        let root_zone = reading.root_zone.clamp(0.0, 1.0);

        Ok(SoilMoisture {
            surface_moisture: surface,
            root_zone_moisture: root_zone,
            moisture_category: categorize_moisture(surface),
            drought_risk: drought_risk(surface, root_zone),
            timestamp: Utc::now(),
            source: self.backend.source(),
        })
    }
}
