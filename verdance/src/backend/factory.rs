//! Backend construction and enum dispatch.
//!
//! [`BackendType`] wraps the two concrete backends so the engine can hold
//! whichever one the availability gate selected without boxing. The
//! [`BackendConnector`] trait is the seam the gate builds backends through.

use super::credentials::Credentials;
use super::http::{AsyncReqwestClient, DEFAULT_HTTP_TIMEOUT_SECS};
use super::remote::RemoteBackend;
use super::simulated::SimulatedBackend;
use super::types::{
    BackendError, ClassArea, DataSource, ImageryBackend, IndexQuery, MoistureReading,
    ScaledComposite,
};
use crate::coord::{DateRange, GeoBounds, GeoPoint};
use crate::indices::IndexStats;
use std::future::Future;

/// Enum wrapper over the concrete backends.
pub enum BackendType {
    /// Live service over reqwest
    Remote(RemoteBackend<AsyncReqwestClient>),
    /// Simulation fallback
    Simulated(SimulatedBackend),
}

impl BackendType {
    /// Whether this is the simulation fallback.
    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated(_))
    }
}

impl ImageryBackend for BackendType {
    async fn index_stats(&self, query: &IndexQuery) -> Result<IndexStats, BackendError> {
        match self {
            Self::Remote(b) => b.index_stats(query).await,
            Self::Simulated(b) => b.index_stats(query).await,
        }
    }

    async fn vegetation_composite(
        &self,
        point: &GeoPoint,
        range: &DateRange,
    ) -> Result<ScaledComposite, BackendError> {
        match self {
            Self::Remote(b) => b.vegetation_composite(point, range).await,
            Self::Simulated(b) => b.vegetation_composite(point, range).await,
        }
    }

    async fn soil_moisture(
        &self,
        point: &GeoPoint,
        range: &DateRange,
    ) -> Result<MoistureReading, BackendError> {
        match self {
            Self::Remote(b) => b.soil_moisture(point, range).await,
            Self::Simulated(b) => b.soil_moisture(point, range).await,
        }
    }

    async fn land_cover(
        &self,
        bounds: &GeoBounds,
        range: &DateRange,
    ) -> Result<Vec<ClassArea>, BackendError> {
        match self {
            Self::Remote(b) => b.land_cover(bounds, range).await,
            Self::Simulated(b) => b.land_cover(bounds, range).await,
        }
    }

    fn source(&self) -> DataSource {
        match self {
            Self::Remote(b) => b.source(),
            Self::Simulated(b) => b.source(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Remote(b) => b.name(),
            Self::Simulated(b) => b.name(),
        }
    }
}

/// Builds backends for the availability gate.
pub trait BackendConnector: Send + Sync {
    type Backend: ImageryBackend + 'static;

    /// Authenticates against the live service.
    fn connect(
        &self,
        credentials: Credentials,
    ) -> impl Future<Output = Result<Self::Backend, BackendError>> + Send;

    /// The simulation fallback, selected when no credentials exist.
    fn simulated(&self) -> Self::Backend;
}

/// Production connector yielding [`BackendType`].
#[derive(Debug, Clone)]
pub struct DefaultConnector {
    http_timeout_secs: u64,
    simulation_seed: Option<u64>,
}

impl DefaultConnector {
    pub fn new(http_timeout_secs: u64, simulation_seed: Option<u64>) -> Self {
        Self {
            http_timeout_secs,
            simulation_seed,
        }
    }
}

impl Default for DefaultConnector {
    fn default() -> Self {
        Self::new(DEFAULT_HTTP_TIMEOUT_SECS, None)
    }
}

impl BackendConnector for DefaultConnector {
    type Backend = BackendType;

    async fn connect(&self, credentials: Credentials) -> Result<BackendType, BackendError> {
        let client = AsyncReqwestClient::with_timeout(self.http_timeout_secs)?;
        let backend = RemoteBackend::connect(client, &credentials).await?;
        Ok(BackendType::Remote(backend))
    }

    fn simulated(&self) -> BackendType {
        let backend = match self.simulation_seed {
            Some(seed) => SimulatedBackend::with_seed(seed),
            None => SimulatedBackend::new(),
        };
        BackendType::Simulated(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::credentials::tests::signing_credentials;
    use crate::coord::QueryRegion;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_simulated_dispatch() {
        let connector = DefaultConnector::new(5, Some(3));
        let backend = connector.simulated();
        assert!(backend.is_simulated());
        assert_eq!(backend.source(), DataSource::Simulated);
        assert_eq!(backend.name(), "simulated");

        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let query = IndexQuery {
            region: QueryRegion::buffer(GeoPoint { lat: 48.0, lng: 2.0 }, 500.0),
            range: DateRange::trailing_days(end, 30),
            max_cloud_cover_pct: 20.0,
        };
        let stats = backend.index_stats(&query).await.unwrap();
        assert!(stats.is_consistent());
    }

    #[tokio::test]
    async fn test_connect_unreachable_endpoint_fails() {
        let connector = DefaultConnector::new(1, None);
        let credentials = signing_credentials("http://127.0.0.1:9");
        assert!(matches!(
            connector.connect(credentials).await,
            Err(BackendError::Http(_))
        ));
    }
}
