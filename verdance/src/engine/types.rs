//! Caller identity and engine status types.

use crate::gate::GateState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Who is invoking an operation.
///
/// Identity is established by the embedding application; the engine only
/// checks that one is present where required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Caller {
    Anonymous,
    Authenticated { subject: String },
}

impl Caller {
    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self::Authenticated {
            subject: subject.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// Operating mode reported by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    /// Credentials present; results come from the remote service
    Live,
    /// No credentials; results are simulated
    Demo,
}

impl EngineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Demo => "demo",
        }
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot returned by status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub available: bool,
    pub mode: EngineMode,
    pub state: GateState,
    pub credentials_path: PathBuf,
}
