//! Analyses over an imagery backend.
//!
//! Each analyzer borrows a backend and a [`CallPolicy`] and is generic over
//! [`crate::backend::ImageryBackend`], so the same code runs against the live
//! service, the simulation fallback, or a scripted test backend.
//!
//! # Failure policies
//!
//! | Analysis | Policy |
//! |----------|--------|
//! | Index, health, moisture, land cover | Backend errors propagate unchanged |
//! | Trend | Per-sample failures skipped ([`best_effort`]) |
//! | Sustainability | Any failure fails the whole ([`all_or_nothing`]) |

mod combinators;
mod health;
mod index;
mod land_cover;
mod moisture;
mod sustainability;
mod trend;

pub use combinators::{
    all_or_nothing, best_effort, bounded_call, CallPolicy, DEFAULT_CALL_TIMEOUT,
};
pub use health::{HealthAnalyzer, VegetationHealth, DEFAULT_HEALTH_MONTHS};
pub use index::{
    IndexCalculator, IndexResult, DEFAULT_INDEX_WINDOW_DAYS, DEFAULT_MAX_CLOUD_COVER_PCT,
};
pub use land_cover::{LandCoverClassifier, LandCoverComposition, LAND_COVER_WINDOW_MONTHS};
pub use moisture::{MoistureAnalyzer, SoilMoisture, MOISTURE_WINDOW_DAYS};
pub use sustainability::{SustainabilityAggregator, SustainabilityAssessment};
pub use trend::{
    sample_windows, TrendEngine, TrendPoint, TrendSeries, DEFAULT_TREND_YEARS, SAMPLES_PER_YEAR,
};
