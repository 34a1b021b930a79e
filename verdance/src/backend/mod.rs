//! Imagery backends.
//!
//! Analyses talk to an [`ImageryBackend`]: either the remote imagery service
//! ([`RemoteBackend`]) or the local simulation fallback ([`SimulatedBackend`]).
//! Which one a process uses is decided once by the availability gate.

pub mod credentials;
mod factory;
mod http;
pub mod remote;
pub mod simulated;
mod types;

pub use credentials::{
    is_available, resolve_credentials_path, Credentials, CREDENTIALS_ENV_VAR, CREDENTIALS_FILE_NAME,
};
pub use factory::{BackendConnector, BackendType, DefaultConnector};
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_HTTP_TIMEOUT_SECS};
pub use remote::RemoteBackend;
pub use simulated::SimulatedBackend;
pub use types::{
    BackendError, ClassArea, DataSource, ImageryBackend, IndexQuery, MoistureReading,
    ScaledComposite,
};
