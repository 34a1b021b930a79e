//! HTTP client abstraction for testability

use super::types::BackendError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Default User-Agent string for HTTP requests.
const DEFAULT_USER_AGENT: &str = concat!("verdance/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Trait for asynchronous HTTP operations against the imagery service.
///
/// The service speaks JSON over POST only: one unauthenticated call to open a
/// session, then bearer-authenticated compute calls.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP POST request with a JSON body.
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn post_json(
        &self,
        url: &str,
        json_body: &str,
    ) -> impl Future<Output = Result<Vec<u8>, BackendError>> + Send;

    /// Performs an async HTTP POST request with a JSON body and Bearer token
    /// authentication.
    fn post_json_with_bearer(
        &self,
        url: &str,
        bearer_token: &str,
        json_body: &str,
    ) -> impl Future<Output = Result<Vec<u8>, BackendError>> + Send;
}

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new client with the default timeout.
    pub fn new() -> Result<Self, BackendError> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT_SECS)
    }

    /// Creates a new client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| BackendError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> Result<Vec<u8>, BackendError> {
        trace!(url = url, "HTTP POST request starting");

        let response = match request.send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(BackendError::Http(format!("Request failed: {}", e)));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(url = url, status = status.as_u16(), "HTTP error status");
            return Err(BackendError::Http(format!(
                "HTTP {} from {}: {}",
                status,
                url,
                body.trim()
            )));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| BackendError::Http(format!("Failed to read response: {}", e)))
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn post_json(&self, url: &str, json_body: &str) -> Result<Vec<u8>, BackendError> {
        let request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(json_body.to_string());
        self.send(request, url).await
    }

    async fn post_json_with_bearer(
        &self,
        url: &str,
        bearer_token: &str,
        json_body: &str,
    ) -> Result<Vec<u8>, BackendError> {
        let request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", bearer_token))
            .body(json_body.to_string());
        self.send(request, url).await
    }
}
