//! Vegetation engine facade implementation.

use super::config::EngineConfig;
use super::types::{Caller, EngineMode, EngineStatus};
use crate::analysis::{
    CallPolicy, HealthAnalyzer, IndexCalculator, IndexResult, LandCoverClassifier,
    LandCoverComposition, MoistureAnalyzer, SoilMoisture, SustainabilityAggregator,
    SustainabilityAssessment, TrendEngine, TrendSeries, VegetationHealth,
};
use crate::backend::{resolve_credentials_path, BackendConnector, DefaultConnector};
use crate::coord::{
    validate_months, validate_radius, validate_years, DateRange, GeoBounds, GeoPoint, QueryRegion,
};
use crate::error::EngineError;
use crate::gate::{AvailabilityGate, GateState};
use chrono::{NaiveDate, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// High-level facade over the vegetation and soil analyses.
///
/// Validates every input before touching a backend, resolves the backend
/// through the availability gate on first use, and bounds each backend call
/// by the configured timeout.
///
/// # Example
///
/// ```ignore
/// use verdance::coord::GeoPoint;
/// use verdance::engine::{EngineConfig, VegetationEngine};
///
/// let engine = VegetationEngine::new(EngineConfig::default());
/// let point = GeoPoint::new(-27.47, 153.02)?;
/// let index = engine.get_index(point, None, None).await?;
/// println!("{} ({})", index.mean, index.category);
/// ```
pub struct VegetationEngine<C: BackendConnector = DefaultConnector> {
    config: EngineConfig,
    gate: AvailabilityGate<C>,
    policy: CallPolicy,
    shutdown: CancellationToken,
}

impl VegetationEngine<DefaultConnector> {
    /// Create an engine using the production backends.
    pub fn new(config: EngineConfig) -> Self {
        let http_timeout_secs = config.request_timeout().as_secs().max(1);
        let connector = DefaultConnector::new(http_timeout_secs, config.simulation_seed());
        Self::with_connector(config, connector)
    }
}

impl<C: BackendConnector> VegetationEngine<C> {
    /// Create an engine building its backend through `connector`.
    pub fn with_connector(config: EngineConfig, connector: C) -> Self {
        let credentials_path = resolve_credentials_path(config.credentials_path());
        let shutdown = CancellationToken::new();
        let policy = CallPolicy::new(config.request_timeout(), shutdown.child_token());

        Self {
            gate: AvailabilityGate::new(connector, credentials_path),
            config,
            policy,
            shutdown,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Presence of credentials and the resulting mode.
    ///
    /// Does not initialize the backend.
    pub fn get_status(&self) -> EngineStatus {
        let available = self.gate.is_available();
        EngineStatus {
            available,
            mode: if available {
                EngineMode::Live
            } else {
                EngineMode::Demo
            },
            state: self.gate.state(),
            credentials_path: self.gate.credentials_path().to_path_buf(),
        }
    }

    /// Current gate state.
    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    /// Index statistics in a buffer around `point`.
    ///
    /// `range` defaults to the trailing 30 days; `radius_m` to the configured
    /// default radius.
    pub async fn get_index(
        &self,
        point: GeoPoint,
        range: Option<DateRange>,
        radius_m: Option<f64>,
    ) -> Result<IndexResult, EngineError> {
        point.validate()?;
        let radius_m = validate_radius(radius_m.unwrap_or(self.config.default_radius_m()))?;
        let range = Self::checked_range(range)?;

        self.index_over(QueryRegion::buffer(point, radius_m), range)
            .await
    }

    /// Index statistics over an explicit rectangle.
    pub async fn get_index_in_bounds(
        &self,
        bounds: GeoBounds,
        range: Option<DateRange>,
    ) -> Result<IndexResult, EngineError> {
        bounds.validate()?;
        let range = Self::checked_range(range)?;

        self.index_over(QueryRegion::rectangle(bounds), range).await
    }

    async fn index_over(
        &self,
        region: QueryRegion,
        range: Option<DateRange>,
    ) -> Result<IndexResult, EngineError> {
        let backend = self.gate.ensure_ready().await?;
        let calculator = IndexCalculator::new(backend.as_ref(), &self.policy)
            .with_max_cloud_cover(self.config.cloud_cover_max_pct());

        let result = match range {
            Some(range) => calculator.compute(region, range).await?,
            None => calculator.compute_recent(region, self.today()).await?,
        };
        Ok(result)
    }

    /// Composite vegetation health over the trailing `months`.
    pub async fn get_vegetation_health(
        &self,
        point: GeoPoint,
        months: Option<u32>,
    ) -> Result<VegetationHealth, EngineError> {
        point.validate()?;
        let months = validate_months(months.unwrap_or(self.config.default_health_months()))?;

        let backend = self.gate.ensure_ready().await?;
        let health = HealthAnalyzer::new(backend.as_ref(), &self.policy)
            .analyze(point, months, self.today())
            .await?;
        Ok(health)
    }

    /// Surface and root-zone moisture with drought risk.
    pub async fn get_soil_moisture(&self, point: GeoPoint) -> Result<SoilMoisture, EngineError> {
        point.validate()?;

        let backend = self.gate.ensure_ready().await?;
        let moisture = MoistureAnalyzer::new(backend.as_ref(), &self.policy)
            .analyze(point, self.today())
            .await?;
        Ok(moisture)
    }

    /// Land-cover composition inside `bounds`.
    pub async fn get_land_cover(
        &self,
        bounds: GeoBounds,
    ) -> Result<LandCoverComposition, EngineError> {
        bounds.validate()?;

        let backend = self.gate.ensure_ready().await?;
        let composition = LandCoverClassifier::new(backend.as_ref(), &self.policy)
            .classify(bounds, self.today())
            .await?;
        Ok(composition)
    }

    /// Combined sustainability assessment.
    ///
    /// Requires an authenticated caller. Fails if any of the index, health or
    /// moisture analyses fails.
    pub async fn get_sustainability_assessment(
        &self,
        caller: &Caller,
        point: GeoPoint,
    ) -> Result<SustainabilityAssessment, EngineError> {
        if !caller.is_authenticated() {
            warn!("Sustainability assessment rejected for anonymous caller");
            return Err(EngineError::Unauthenticated);
        }
        point.validate()?;

        let backend = self.gate.ensure_ready().await?;
        let assessment =
            SustainabilityAggregator::new(backend.as_ref(), &self.policy, self.config.default_radius_m())
                .with_max_cloud_cover(self.config.cloud_cover_max_pct())
                .assess(point, self.today())
                .await?;
        Ok(assessment)
    }

    /// Quarterly index history over `years` and its direction.
    pub async fn get_trend(
        &self,
        point: GeoPoint,
        years: Option<u32>,
    ) -> Result<TrendSeries, EngineError> {
        point.validate()?;
        let years = validate_years(years.unwrap_or(self.config.default_trend_years()))?;

        let backend = self.gate.ensure_ready().await?;
        let calculator = IndexCalculator::new(backend.as_ref(), &self.policy)
            .with_max_cloud_cover(self.config.cloud_cover_max_pct());
        let series = TrendEngine::new(calculator, self.config.default_radius_m())
            .sample(point, years, self.today())
            .await?;
        Ok(series)
    }

    /// Cancels all in-flight backend calls.
    ///
    /// Calls made after shutdown fail with a cancellation error.
    pub fn shutdown(&self) {
        info!("Vegetation engine shutting down");
        self.shutdown.cancel();
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    fn checked_range(range: Option<DateRange>) -> Result<Option<DateRange>, EngineError> {
        match range {
            Some(r) => Ok(Some(DateRange::new(r.start, r.end)?)),
            None => Ok(None),
        }
    }
}

impl<C: BackendConnector> Drop for VegetationEngine<C> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, DataSource};
    use crate::classify::categorize_index;
    use crate::coord::ValidationError;

    fn demo_engine() -> (VegetationEngine, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::builder()
            .credentials_path(dir.path().join("credentials.json"))
            .simulation_seed(17)
            .build();
        (VegetationEngine::new(config), dir)
    }

    #[test]
    fn test_status_without_credentials() {
        let (engine, _dir) = demo_engine();
        let status = engine.get_status();
        assert!(!status.available);
        assert_eq!(status.mode, EngineMode::Demo);
        assert_eq!(status.state, GateState::Uninitialized);
    }

    #[tokio::test]
    async fn test_validation_precedes_backend() {
        let (engine, _dir) = demo_engine();

        let bad_point = GeoPoint { lat: 95.0, lng: 0.0 };
        assert_eq!(
            engine.get_index(bad_point, None, None).await,
            Err(EngineError::Validation(ValidationError::InvalidLatitude(95.0)))
        );

        let point = GeoPoint { lat: 10.0, lng: 10.0 };
        assert!(matches!(
            engine.get_index(point, None, Some(50.0)).await,
            Err(EngineError::Validation(ValidationError::InvalidRadius(_)))
        ));
        assert!(matches!(
            engine.get_vegetation_health(point, Some(25)).await,
            Err(EngineError::Validation(ValidationError::InvalidMonths(25)))
        ));
        assert!(matches!(
            engine.get_trend(point, Some(0)).await,
            Err(EngineError::Validation(ValidationError::InvalidYears(0)))
        ));

        let inverted = GeoBounds {
            north: 0.0,
            south: 1.0,
            east: 1.0,
            west: 0.0,
        };
        assert!(matches!(
            engine.get_land_cover(inverted).await,
            Err(EngineError::Validation(ValidationError::InvalidBounds(_)))
        ));

        // Nothing above reached the gate
        assert_eq!(engine.gate_state(), GateState::Uninitialized);
    }

    #[tokio::test]
    async fn test_demo_index() {
        let (engine, _dir) = demo_engine();
        let point = GeoPoint::new(-27.0, 153.0).unwrap();

        let result = engine.get_index(point, None, None).await.unwrap();
        assert_eq!(result.source, DataSource::Simulated);
        assert_eq!(result.category, categorize_index(result.mean));
        assert_eq!(engine.gate_state(), GateState::Simulated);
    }

    #[tokio::test]
    async fn test_anonymous_assessment_rejected() {
        let (engine, _dir) = demo_engine();
        let point = GeoPoint::new(1.0, 1.0).unwrap();

        assert_eq!(
            engine
                .get_sustainability_assessment(&Caller::Anonymous, point)
                .await,
            Err(EngineError::Unauthenticated)
        );
        assert_eq!(engine.gate_state(), GateState::Uninitialized);

        let assessment = engine
            .get_sustainability_assessment(&Caller::authenticated("grower"), point)
            .await
            .unwrap();
        assert!(assessment.score <= 100);
    }

    #[tokio::test]
    async fn test_calls_after_shutdown_are_cancelled() {
        let (engine, _dir) = demo_engine();
        engine.shutdown();
        assert!(engine.is_shut_down());

        let point = GeoPoint::new(1.0, 1.0).unwrap();
        assert_eq!(
            engine.get_soil_moisture(point).await,
            Err(EngineError::Backend(BackendError::Cancelled))
        );
    }
}
