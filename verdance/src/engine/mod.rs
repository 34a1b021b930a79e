//! Public entry point of the library.
//!
//! [`VegetationEngine`] exposes every analysis as one validated async
//! operation. [`EngineConfig`] carries its settings.

mod config;
mod facade;
mod types;

pub use config::{EngineConfig, EngineConfigBuilder, DEFAULT_RADIUS_M};
pub use facade::VegetationEngine;
pub use types::{Caller, EngineMode, EngineStatus};
