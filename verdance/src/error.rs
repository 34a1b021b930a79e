//! Public error type of the engine.

use crate::backend::BackendError;
use crate::coord::ValidationError;
use thiserror::Error;

/// Errors returned by [`crate::engine::VegetationEngine`] operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Input rejected before any backend work
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// A backend call failed while computing the result
    #[error("Backend failure: {0}")]
    Backend(#[from] BackendError),

    /// The remote backend could not be initialized
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// The operation requires an authenticated caller
    #[error("Authentication required")]
    Unauthenticated,
}

impl EngineError {
    /// Whether the failure was caused by the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Convenience alias for engine results.
pub type Result<T> = std::result::Result<T, EngineError>;
