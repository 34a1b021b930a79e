//! Live imagery backend.
//!
//! # Authentication
//!
//! The service uses a two-step scheme:
//! 1. Open a session via `POST {endpoint}/v1/sessions`, presenting an RS256
//!    assertion signed with the service-account key (audience: the session
//!    URL)
//! 2. Send the session token as a Bearer token on every compute call
//!
//! The session is opened once, when the backend is connected.
//!
//! # Compute API
//!
//! Every analysis is a single `POST {endpoint}/v1/projects/{project}/value:compute`
//! describing the collection, geometry, date window, band math and reducers.
//! The service evaluates the reduction and returns named scalar outputs or
//! grouped sums.

mod request;

pub use request::{
    ComputeRequest, ComputeResponse, Dataset, Expression, Geometry, GroupValue, PropertyFilter,
    SpatialReducer, TemporalReducer, CLOUD_PROPERTY, LAND_COVER, SOIL_MOISTURE,
    SURFACE_REFLECTANCE, VEGETATION_INDICES,
};

use super::credentials::Credentials;
use super::http::AsyncHttpClient;
use super::types::{
    BackendError, ClassArea, DataSource, ImageryBackend, IndexQuery, MoistureReading,
    ScaledComposite,
};
use crate::coord::{DateRange, GeoBounds, GeoPoint};
use crate::indices::IndexStats;
use chrono::Utc;
use request::{SessionRequest, SessionResponse};
use tracing::{debug, info};

/// Output band name of the normalized-difference expression.
const INDEX_BAND: &str = "NDVI";

/// Remote imagery backend over an [`AsyncHttpClient`].
pub struct RemoteBackend<C: AsyncHttpClient> {
    http_client: C,
    endpoint: String,
    project_id: String,
    session_token: String,
}

impl<C: AsyncHttpClient> RemoteBackend<C> {
    /// Connects to the service described by `credentials`.
    ///
    /// Opens a session immediately; the backend is unusable without one.
    ///
    /// # Errors
    ///
    /// Returns an error if the session call fails or returns no token.
    pub async fn connect(http_client: C, credentials: &Credentials) -> Result<Self, BackendError> {
        let endpoint = credentials.endpoint().to_string();
        let session_token = Self::create_session(&http_client, &endpoint, credentials).await?;

        info!(
            endpoint = %endpoint,
            project = %credentials.project_id,
            "Imagery service session opened"
        );

        Ok(Self {
            http_client,
            endpoint,
            project_id: credentials.project_id.clone(),
            session_token,
        })
    }

    async fn create_session(
        http_client: &C,
        endpoint: &str,
        credentials: &Credentials,
    ) -> Result<String, BackendError> {
        let url = format!("{}/v1/sessions", endpoint);
        let assertion = credentials.sign_assertion(&url, Utc::now().timestamp())?;
        let body = serde_json::to_string(&SessionRequest {
            project_id: &credentials.project_id,
            client_email: &credentials.client_email,
            assertion: &assertion,
        })
        .map_err(|e| BackendError::InvalidResponse(format!("Failed to encode session: {}", e)))?;

        let response = http_client.post_json(&url, &body).await?;

        let session: SessionResponse = serde_json::from_slice(&response).map_err(|e| {
            BackendError::InvalidResponse(format!("Failed to parse session token: {}", e))
        })?;

        if session.session.is_empty() {
            return Err(BackendError::InvalidResponse(
                "Session token is empty".to_string(),
            ));
        }
        Ok(session.session)
    }

    fn compute_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/value:compute",
            self.endpoint, self.project_id
        )
    }

    /// Sends one compute request and decodes the response.
    pub async fn compute(&self, request: &ComputeRequest) -> Result<ComputeResponse, BackendError> {
        let body = serde_json::to_string(request)
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to encode request: {}", e)))?;

        debug!(dataset = %request.dataset, "Submitting compute request");

        let response = self
            .http_client
            .post_json_with_bearer(&self.compute_url(), &self.session_token, &body)
            .await?;
        ComputeResponse::parse(&response)
    }
}

fn select(bands: &[&str]) -> Expression {
    Expression::Select {
        bands: bands.iter().map(|b| b.to_string()).collect(),
    }
}

/// Request for index statistics over a region.
pub fn index_request(query: &IndexQuery) -> ComputeRequest {
    ComputeRequest {
        dataset: SURFACE_REFLECTANCE.id.to_string(),
        geometry: Geometry::from(&query.region),
        start_date: query.range.start,
        end_date: query.range.end,
        filter: Some(PropertyFilter {
            property: CLOUD_PROPERTY.to_string(),
            less_than: query.max_cloud_cover_pct,
        }),
        expression: Expression::NormalizedDifference {
            positive: "B8".to_string(),
            negative: "B4".to_string(),
            name: INDEX_BAND.to_string(),
        },
        temporal_reducer: TemporalReducer::Median,
        reducers: vec![
            SpatialReducer::Mean,
            SpatialReducer::Min,
            SpatialReducer::Max,
            SpatialReducer::StdDev,
        ],
        scale_m: SURFACE_REFLECTANCE.scale_m,
    }
}

/// Request for the composite vegetation product at a point.
pub fn composite_request(point: &GeoPoint, range: &DateRange) -> ComputeRequest {
    ComputeRequest {
        dataset: VEGETATION_INDICES.id.to_string(),
        geometry: Geometry::point(point),
        start_date: range.start,
        end_date: range.end,
        filter: None,
        expression: select(&["NDVI", "EVI"]),
        temporal_reducer: TemporalReducer::Mean,
        reducers: vec![SpatialReducer::Mean],
        scale_m: VEGETATION_INDICES.scale_m,
    }
}

/// Request for surface and root-zone soil moisture at a point.
pub fn moisture_request(point: &GeoPoint, range: &DateRange) -> ComputeRequest {
    ComputeRequest {
        dataset: SOIL_MOISTURE.id.to_string(),
        geometry: Geometry::point(point),
        start_date: range.start,
        end_date: range.end,
        filter: None,
        expression: select(&["sm_surface", "sm_rootzone"]),
        temporal_reducer: TemporalReducer::Mean,
        reducers: vec![SpatialReducer::Mean],
        scale_m: SOIL_MOISTURE.scale_m,
    }
}

/// Request for the modal land-cover label areas inside a rectangle.
pub fn land_cover_request(bounds: &GeoBounds, range: &DateRange) -> ComputeRequest {
    ComputeRequest {
        dataset: LAND_COVER.id.to_string(),
        geometry: Geometry::rectangle(bounds),
        start_date: range.start,
        end_date: range.end,
        filter: None,
        expression: select(&["label"]),
        temporal_reducer: TemporalReducer::Mode,
        reducers: vec![SpatialReducer::GroupedAreaSum],
        scale_m: LAND_COVER.scale_m,
    }
}

impl<C: AsyncHttpClient> ImageryBackend for RemoteBackend<C> {
    async fn index_stats(&self, query: &IndexQuery) -> Result<IndexStats, BackendError> {
        let response = self.compute(&index_request(query)).await?;
        Ok(IndexStats {
            mean: response.value("mean")?,
            min: response.value("min")?,
            max: response.value("max")?,
            std_dev: response.value("std_dev")?,
        })
    }

    async fn vegetation_composite(
        &self,
        point: &GeoPoint,
        range: &DateRange,
    ) -> Result<ScaledComposite, BackendError> {
        let response = self.compute(&composite_request(point, range)).await?;
        Ok(ScaledComposite {
            index: response.value("NDVI")?,
            secondary_index: response.value("EVI")?,
        })
    }

    async fn soil_moisture(
        &self,
        point: &GeoPoint,
        range: &DateRange,
    ) -> Result<MoistureReading, BackendError> {
        let response = self.compute(&moisture_request(point, range)).await?;
        Ok(MoistureReading {
            surface: response.value("sm_surface")?,
            root_zone: response.value("sm_rootzone")?,
        })
    }

    async fn land_cover(
        &self,
        bounds: &GeoBounds,
        range: &DateRange,
    ) -> Result<Vec<ClassArea>, BackendError> {
        let response = self.compute(&land_cover_request(bounds, range)).await?;
        Ok(response
            .groups
            .iter()
            .map(|g| ClassArea {
                code: g.class,
                area_m2: g.sum.max(0.0),
            })
            .collect())
    }

    fn source(&self) -> DataSource {
        DataSource::Remote
    }

    fn name(&self) -> &str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::credentials::tests::{signing_credentials, verify_assertion};
    use crate::backend::http::tests::MockAsyncHttpClient;
    use crate::coord::QueryRegion;
    use chrono::NaiveDate;

    fn credentials() -> Credentials {
        signing_credentials("http://imagery.test")
    }

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    async fn connected(mock: MockAsyncHttpClient) -> RemoteBackend<MockAsyncHttpClient> {
        RemoteBackend::connect(mock, &credentials()).await.unwrap()
    }

    #[tokio::test]
    async fn test_connect_opens_session() {
        let mock = MockAsyncHttpClient::new().respond_json(r#"{"session":"tok-1"}"#);
        let backend = connected(mock.clone()).await;

        assert_eq!(backend.session_token, "tok-1");
        let requests = mock.requests();
        assert_eq!(requests[0].url, "http://imagery.test/v1/sessions");
        assert!(requests[0].body.contains("field-survey"));
        assert!(!requests[0].body.contains("BEGIN PRIVATE KEY"));

        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        let assertion = body["assertion"].as_str().unwrap();
        let claims = verify_assertion(assertion, "http://imagery.test/v1/sessions");
        assert_eq!(claims.iss, "svc@example.com");
    }

    #[tokio::test]
    async fn test_connect_rejects_unusable_key_before_any_request() {
        let mock = MockAsyncHttpClient::new().respond_json(r#"{"session":"tok"}"#);
        let mut creds = credentials();
        creds.private_key = "not a key".to_string();

        let result = RemoteBackend::connect(mock.clone(), &creds).await;
        assert!(matches!(result, Err(BackendError::Credentials(_))));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_connect_fails_without_token() {
        let mock = MockAsyncHttpClient::new().respond_json(r#"{"error":"denied"}"#);
        let result = RemoteBackend::connect(mock, &credentials()).await;
        assert!(matches!(result, Err(BackendError::InvalidResponse(_))));

        let mock = MockAsyncHttpClient::new()
            .respond_error(BackendError::Http("HTTP 401".to_string()));
        let result = RemoteBackend::connect(mock, &credentials()).await;
        assert_eq!(result.err(), Some(BackendError::Http("HTTP 401".to_string())));
    }

    #[tokio::test]
    async fn test_index_stats_request_and_parse() {
        let mock = MockAsyncHttpClient::new()
            .respond_json(r#"{"session":"tok"}"#)
            .respond_json(r#"{"result":{"mean":0.52,"min":0.1,"max":0.8,"std_dev":0.12}}"#);
        let backend = connected(mock.clone()).await;

        let query = IndexQuery {
            region: QueryRegion::buffer(GeoPoint { lat: -27.0, lng: 153.0 }, 500.0),
            range: range(),
            max_cloud_cover_pct: 20.0,
        };
        let stats = backend.index_stats(&query).await.unwrap();
        assert_eq!(stats.mean, 0.52);
        assert_eq!(stats.std_dev, 0.12);

        let request = &mock.requests()[1];
        assert_eq!(
            request.url,
            "http://imagery.test/v1/projects/field-survey/value:compute"
        );
        assert_eq!(request.bearer.as_deref(), Some("tok"));

        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["dataset"], SURFACE_REFLECTANCE.id);
        assert_eq!(body["filter"]["property"], CLOUD_PROPERTY);
        assert_eq!(body["filter"]["less_than"], 20.0);
        assert_eq!(body["expression"]["positive"], "B8");
        assert_eq!(body["expression"]["negative"], "B4");
        assert_eq!(body["geometry"]["type"], "buffer");
    }

    #[tokio::test]
    async fn test_index_stats_missing_value() {
        let mock = MockAsyncHttpClient::new()
            .respond_json(r#"{"session":"tok"}"#)
            .respond_json(r#"{"result":{"mean":null,"min":null,"max":null,"std_dev":null}}"#);
        let backend = connected(mock).await;

        let query = IndexQuery {
            region: QueryRegion::buffer(GeoPoint { lat: 0.0, lng: 0.0 }, 500.0),
            range: range(),
            max_cloud_cover_pct: 20.0,
        };
        assert!(matches!(
            backend.index_stats(&query).await,
            Err(BackendError::MissingValue(_))
        ));
    }

    #[tokio::test]
    async fn test_composite_and_moisture() {
        let mock = MockAsyncHttpClient::new()
            .respond_json(r#"{"session":"tok"}"#)
            .respond_json(r#"{"result":{"NDVI":6543.0,"EVI":3100.0}}"#)
            .respond_json(r#"{"result":{"sm_surface":0.27,"sm_rootzone":0.31}}"#);
        let backend = connected(mock.clone()).await;
        let point = GeoPoint { lat: 10.0, lng: 20.0 };

        let composite = backend.vegetation_composite(&point, &range()).await.unwrap();
        assert_eq!(composite.index, 6543.0);
        assert_eq!(composite.secondary_index, 3100.0);

        let moisture = backend.soil_moisture(&point, &range()).await.unwrap();
        assert_eq!(moisture.surface, 0.27);
        assert_eq!(moisture.root_zone, 0.31);

        let body: serde_json::Value = serde_json::from_str(&mock.requests()[2].body).unwrap();
        assert_eq!(body["dataset"], SOIL_MOISTURE.id);
        assert_eq!(body["scale_m"], 11_000.0);
    }

    #[tokio::test]
    async fn test_land_cover_groups() {
        let mock = MockAsyncHttpClient::new()
            .respond_json(r#"{"session":"tok"}"#)
            .respond_json(r#"{"groups":[{"class":1,"sum":3000000.0},{"class":6,"sum":1000000.0}]}"#);
        let backend = connected(mock.clone()).await;
        let bounds = GeoBounds::new(1.0, 0.0, 1.0, 0.0).unwrap();

        let areas = backend.land_cover(&bounds, &range()).await.unwrap();
        assert_eq!(
            areas,
            vec![
                ClassArea { code: 1, area_m2: 3_000_000.0 },
                ClassArea { code: 6, area_m2: 1_000_000.0 },
            ]
        );

        let body: serde_json::Value = serde_json::from_str(&mock.requests()[1].body).unwrap();
        assert_eq!(body["temporal_reducer"], "mode");
        assert_eq!(body["geometry"]["type"], "rectangle");
    }

    #[test]
    fn test_source_label() {
        let backend = RemoteBackend {
            http_client: MockAsyncHttpClient::new(),
            endpoint: "http://imagery.test".to_string(),
            project_id: "p".to_string(),
            session_token: "t".to_string(),
        };
        assert_eq!(backend.source(), DataSource::Remote);
    }
}
