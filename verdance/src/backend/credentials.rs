//! Service-account credentials artifact.
//!
//! The mere presence of this file selects live mode for the process. Its
//! contents are only read when the remote backend is initialized.
//!
//! The private key never leaves the process: it signs a short-lived RS256
//! assertion that the service exchanges for a session token.

use super::types::BackendError;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable overriding the credentials location.
pub const CREDENTIALS_ENV_VAR: &str = "VERDANCE_CREDENTIALS";

/// File name of the credentials artifact inside the config directory.
pub const CREDENTIALS_FILE_NAME: &str = "credentials.json";

/// Imagery service endpoint used when the artifact does not name one.
pub const DEFAULT_ENDPOINT: &str = "https://earthengine.googleapis.com";

/// Lifetime of a signed session assertion, in seconds.
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Claims of the session assertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Service-account credentials for the remote imagery service.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Credentials {
    /// Reads and parses the artifact at `path`.
    pub fn load(path: &Path) -> Result<Self, BackendError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BackendError::Credentials(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    /// Parses the artifact from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, BackendError> {
        let credentials: Self = serde_json::from_str(json)
            .map_err(|e| BackendError::Credentials(format!("Invalid credentials JSON: {}", e)))?;

        if credentials.project_id.trim().is_empty() {
            return Err(BackendError::Credentials(
                "project_id must not be empty".to_string(),
            ));
        }
        if credentials.client_email.trim().is_empty() {
            return Err(BackendError::Credentials(
                "client_email must not be empty".to_string(),
            ));
        }
        Ok(credentials)
    }

    /// Signs an assertion for `audience`, issued at `issued_at` (Unix
    /// seconds), with the account's RSA private key.
    ///
    /// # Errors
    ///
    /// [`BackendError::Credentials`] if the key is not a PEM-encoded RSA key.
    pub fn sign_assertion(&self, audience: &str, issued_at: i64) -> Result<String, BackendError> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| BackendError::Credentials(format!("Invalid private key: {}", e)))?;
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            sub: self.client_email.clone(),
            aud: audience.to_string(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| BackendError::Credentials(format!("Failed to sign assertion: {}", e)))
    }

    /// Service endpoint without a trailing slash.
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/')
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Resolves where the credentials artifact is expected.
///
/// Order: explicit path, [`CREDENTIALS_ENV_VAR`], then
/// `~/.verdance/credentials.json`.
pub fn resolve_credentials_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(path) = std::env::var_os(CREDENTIALS_ENV_VAR).filter(|v| !v.is_empty()) {
        return PathBuf::from(path);
    }
    crate::config::config_directory().join(CREDENTIALS_FILE_NAME)
}

/// Fast presence check of the artifact. Does not read or validate it.
pub fn is_available(path: &Path) -> bool {
    path.is_file()
}
