//! Join combinators and per-call bounds.
//!
//! The engine uses two failure policies:
//!
//! - [`all_or_nothing`]: concurrent, fail-fast. The first error is returned
//!   and the remaining futures are dropped, which cancels them.
//! - [`best_effort`]: sequential, fail-soft. Failed items are logged and
//!   skipped; only cancellation stops the run.
//!
//! Every individual backend call goes through [`bounded_call`], which applies
//! the timeout and observes the engine's cancellation token.

use crate::backend::BackendError;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default per-call timeout.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout and cancellation applied to every backend call.
#[derive(Debug, Clone)]
pub struct CallPolicy {
    timeout: Duration,
    cancel: CancellationToken,
}

impl CallPolicy {
    pub fn new(timeout: Duration, cancel: CancellationToken) -> Self {
        Self { timeout, cancel }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Runs `call` under this policy.
    pub async fn run<T, F>(&self, call: F) -> Result<T, BackendError>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        bounded_call(self.timeout, &self.cancel, call).await
    }
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CALL_TIMEOUT, CancellationToken::new())
    }
}

/// Runs a backend call with a timeout, aborting early on cancellation.
pub async fn bounded_call<T, F>(
    timeout: Duration,
    cancel: &CancellationToken,
    call: F,
) -> Result<T, BackendError>
where
    F: Future<Output = Result<T, BackendError>>,
{
    tokio::select! {
        biased;

        _ = cancel.cancelled() => {
            debug!("Backend call cancelled");
            Err(BackendError::Cancelled)
        }

        result = tokio::time::timeout(timeout, call) => match result {
            Ok(inner) => inner,
            Err(_) => {
                warn!(timeout_ms = timeout.as_millis() as u64, "Backend call timed out");
                Err(BackendError::Timeout(timeout))
            }
        },
    }
}

/// Runs three fallible futures concurrently, failing on the first error.
///
/// Siblings still in flight when one fails are dropped, which cancels them.
pub async fn all_or_nothing<A, B, C, E, FA, FB, FC>(a: FA, b: FB, c: FC) -> Result<(A, B, C), E>
where
    FA: Future<Output = Result<A, E>>,
    FB: Future<Output = Result<B, E>>,
    FC: Future<Output = Result<C, E>>,
{
    tokio::try_join!(a, b, c)
}

/// Calls `call` for each key in order, keeping the successes.
///
/// Failures are logged and skipped. [`BackendError::Cancelled`] stops the run
/// and is returned, since nothing after it can succeed.
pub async fn best_effort<K, T, F, Fut>(
    keys: impl IntoIterator<Item = K>,
    mut call: F,
) -> Result<Vec<(K, T)>, BackendError>
where
    K: Copy + fmt::Debug,
    F: FnMut(K) -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    let mut collected = Vec::new();
    let mut skipped = 0usize;

    for key in keys {
        match call(key).await {
            Ok(value) => collected.push((key, value)),
            Err(BackendError::Cancelled) => return Err(BackendError::Cancelled),
            Err(e) => {
                skipped += 1;
                warn!(key = ?key, error = %e, "Skipping failed sample");
            }
        }
    }

    if skipped > 0 {
        debug!(
            kept = collected.len(),
            skipped = skipped,
            "Best-effort run finished with skipped samples"
        );
    }
    Ok(collected)
}
