//! Availability gate: one-time selection of the live or simulated backend.
//!
//! The first caller of [`AvailabilityGate::ensure_ready`] decides the mode for
//! the rest of the process:
//!
//! ```text
//! Uninitialized ──► Initializing ──┬──► Live       (credentials present, session opened)
//!                                  ├──► Simulated  (no credentials artifact)
//!                                  └──► Failed     (credentials present, connect failed)
//! ```
//!
//! Callers that arrive while an attempt is in flight wait for it and receive
//! its outcome, success or failure. `Live` and `Simulated` are terminal.
//! `Failed` is not: a call that arrives after a failed attempt has completed
//! makes a fresh attempt. There are no background retries.

use crate::backend::{is_available, BackendConnector, Credentials};
use crate::error::EngineError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OnceCell};
use tracing::{error, info, warn};

/// Observable state of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    Uninitialized,
    Initializing,
    Live,
    Simulated,
    Failed,
}

impl GateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Live => "live",
            Self::Simulated => "simulated",
            Self::Failed => "failed",
        }
    }

    /// Whether a backend has been selected.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Live | Self::Simulated)
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the most recent completed attempt.
#[derive(Default)]
struct AttemptLog {
    last_failure: Option<EngineError>,
}

/// Lazily initializes the backend exactly once.
pub struct AvailabilityGate<C: BackendConnector> {
    connector: C,
    credentials_path: PathBuf,
    backend: OnceCell<Arc<C::Backend>>,
    /// Held for the whole duration of an attempt.
    attempt: AsyncMutex<AttemptLog>,
    /// Number of completed attempts; only advanced under `attempt`.
    completed: AtomicU64,
    state: Mutex<GateState>,
}

impl<C: BackendConnector> AvailabilityGate<C> {
    pub fn new(connector: C, credentials_path: PathBuf) -> Self {
        Self {
            connector,
            credentials_path,
            backend: OnceCell::new(),
            attempt: AsyncMutex::new(AttemptLog::default()),
            completed: AtomicU64::new(0),
            state: Mutex::new(GateState::Uninitialized),
        }
    }

    /// Fast synchronous presence check of the credentials artifact.
    ///
    /// Says nothing about readiness: a present but invalid artifact still
    /// reports `true`.
    pub fn is_available(&self) -> bool {
        is_available(&self.credentials_path)
    }

    /// Path of the credentials artifact this gate checks.
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Current state.
    pub fn state(&self) -> GateState {
        *self.state.lock()
    }

    /// Returns the selected backend, initializing it on first use.
    ///
    /// Idempotent. Concurrent callers share a single in-flight attempt and
    /// all receive its outcome.
    ///
    /// # Errors
    ///
    /// [`EngineError::Initialization`] if credentials exist but the live
    /// backend could not be set up.
    pub async fn ensure_ready(&self) -> Result<Arc<C::Backend>, EngineError> {
        if let Some(backend) = self.backend.get() {
            return Ok(Arc::clone(backend));
        }

        let seen = self.completed.load(Ordering::Acquire);
        let mut log = self.attempt.lock().await;

        if let Some(backend) = self.backend.get() {
            return Ok(Arc::clone(backend));
        }
        // An attempt finished while we waited: it was ours too.
        if self.completed.load(Ordering::Acquire) > seen {
            if let Some(failure) = &log.last_failure {
                return Err(failure.clone());
            }
        }

        let result = self.initialize().await;
        self.completed.fetch_add(1, Ordering::AcqRel);
        match result {
            Ok(backend) => {
                log.last_failure = None;
                // Only set while holding the attempt lock after `get()` saw
                // an empty cell, so this cannot collide.
                let _ = self.backend.set(Arc::clone(&backend));
                Ok(backend)
            }
            Err(e) => {
                log.last_failure = Some(e.clone());
                Err(e)
            }
        }
    }

    async fn initialize(&self) -> Result<Arc<C::Backend>, EngineError> {
        self.set_state(GateState::Initializing);

        if !self.is_available() {
            info!(
                path = %self.credentials_path.display(),
                "No credentials found, using simulated backend"
            );
            self.set_state(GateState::Simulated);
            return Ok(Arc::new(self.connector.simulated()));
        }

        let result = match Credentials::load(&self.credentials_path) {
            Ok(credentials) => self.connector.connect(credentials).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(backend) => {
                info!(
                    path = %self.credentials_path.display(),
                    "Remote imagery backend ready"
                );
                self.set_state(GateState::Live);
                Ok(Arc::new(backend))
            }
            Err(e) => {
                error!(
                    path = %self.credentials_path.display(),
                    error = %e,
                    "Remote backend initialization failed"
                );
                self.set_state(GateState::Failed);
                Err(EngineError::Initialization(e.to_string()))
            }
        }
    }

    fn set_state(&self, next: GateState) {
        let mut state = self.state.lock();
        if *state == GateState::Failed && next == GateState::Initializing {
            warn!("Re-attempting backend initialization after failure");
        }
        *state = next;
    }
}
