//! Simulation fallback backend.
//!
//! Produces geographically plausible values when no credentials are present,
//! so every analysis still returns a well-formed result. Values are driven by
//! a latitude/coast heuristic, a hemisphere-aware seasonal term and bounded
//! uniform noise.

use super::types::{
    BackendError, ClassArea, DataSource, ImageryBackend, IndexQuery, MoistureReading,
    ScaledComposite,
};
use crate::classify::LandCoverClass;
use crate::coord::{area_km2, DateRange, GeoBounds, GeoPoint};
use crate::indices::{IndexStats, PRODUCT_SCALE_FACTOR};
use chrono::Datelike;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Index of a temperate inland location.
pub const BASELINE_INDEX: f64 = 0.45;

/// Range the geographic baseline is clamped to.
pub const MIN_BASELINE: f64 = 0.05;
pub const MAX_BASELINE: f64 = 0.85;

/// Peak seasonal deviation from the baseline.
pub const SEASONAL_AMPLITUDE: f64 = 0.05;

const TROPICAL_LAT: f64 = 23.5;
const POLAR_LAT: f64 = 60.0;
const ARID_BELT: (f64, f64) = (15.0, 35.0);

const TROPICAL_ADJUSTMENT: f64 = 0.15;
const POLAR_ADJUSTMENT: f64 = -0.25;
const ARID_ADJUSTMENT: f64 = -0.15;
const COASTAL_ADJUSTMENT: f64 = 0.10;

/// Bounded noise added to sampled values.
const NOISE: f64 = 0.05;

/// Known wet coastal zones as `(north, south, east, west)`.
const COASTAL_ZONES: &[(f64, f64, f64, f64)] = &[
    // Eastern Australia
    (-10.0, -44.0, 155.0, 145.0),
    // Western Europe
    (60.0, 36.0, 5.0, -10.0),
    // US east coast
    (45.0, 25.0, -69.0, -82.0),
    // Pacific northwest
    (50.0, 40.0, -120.0, -125.0),
    // South-eastern Brazil
    (-15.0, -30.0, -39.0, -50.0),
];

/// Relative land-cover weights per class code, before the vegetation skew.
const COVER_WEIGHTS: [f64; 9] = [0.08, 0.25, 0.20, 0.04, 0.15, 0.10, 0.08, 0.08, 0.02];

/// True when the point falls inside one of the known coastal zones.
pub fn is_coastal(point: &GeoPoint) -> bool {
    COASTAL_ZONES.iter().any(|&(north, south, east, west)| {
        point.lat <= north && point.lat >= south && point.lng <= east && point.lng >= west
    })
}

/// Deterministic geographic baseline index for a location.
pub fn baseline_index(point: &GeoPoint) -> f64 {
    let abs_lat = point.lat.abs();
    let coastal = is_coastal(point);
    let mut index = BASELINE_INDEX;

    if abs_lat < TROPICAL_LAT {
        index += TROPICAL_ADJUSTMENT;
    }
    if abs_lat > POLAR_LAT {
        index += POLAR_ADJUSTMENT;
    }
    if (ARID_BELT.0..=ARID_BELT.1).contains(&abs_lat) && !coastal {
        index += ARID_ADJUSTMENT;
    }
    if coastal {
        index += COASTAL_ADJUSTMENT;
    }
    index.clamp(MIN_BASELINE, MAX_BASELINE)
}

/// Seasonal offset for the window ending in `month` (1-12).
///
/// Peaks in July north of the equator and in January south of it.
pub fn seasonal_offset(point: &GeoPoint, month: u32) -> f64 {
    let peak = if point.lat >= 0.0 { 7.0 } else { 1.0 };
    SEASONAL_AMPLITUDE * (2.0 * PI * (month as f64 - peak) / 12.0).cos()
}

/// Simulated imagery backend.
pub struct SimulatedBackend {
    rng: Mutex<StdRng>,
}

impl SimulatedBackend {
    /// Creates a backend seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates a backend with reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn noise(&self, amplitude: f64) -> f64 {
        self.rng.lock().gen_range(-amplitude..=amplitude)
    }

    fn uniform(&self, low: f64, high: f64) -> f64 {
        self.rng.lock().gen_range(low..=high)
    }

    /// Index level for a location and window before noise.
    fn expected_index(&self, point: &GeoPoint, range: &DateRange) -> f64 {
        baseline_index(point) + seasonal_offset(point, range.end.month())
    }

    fn sample_stats(&self, point: &GeoPoint, range: &DateRange) -> IndexStats {
        let mean = (self.expected_index(point, range) + self.noise(NOISE)).clamp(-1.0, 1.0);
        let std_dev = self.uniform(0.02, 0.12);
        let min = (mean - 2.0 * std_dev - self.uniform(0.0, NOISE)).max(-1.0);
        let max = (mean + 2.0 * std_dev + self.uniform(0.0, NOISE)).min(1.0);

        IndexStats {
            mean,
            min,
            max,
            std_dev,
        }
    }

    fn sample_composite(&self, point: &GeoPoint, range: &DateRange) -> ScaledComposite {
        let index = (self.expected_index(point, range) + self.noise(NOISE)).clamp(-1.0, 1.0);
        let secondary = (index * 0.6 + self.noise(0.03)).clamp(-0.2, 1.0);

        ScaledComposite {
            index: (index * PRODUCT_SCALE_FACTOR).round(),
            secondary_index: (secondary * PRODUCT_SCALE_FACTOR).round(),
        }
    }

    fn sample_moisture(&self, point: &GeoPoint, range: &DateRange) -> MoistureReading {
        let wetness = self.expected_index(point, range);
        let surface = (0.08 + wetness * 0.35 + self.noise(NOISE)).clamp(0.02, 0.6);
        let root_zone = (surface + self.noise(NOISE)).clamp(0.02, 0.6);

        MoistureReading { surface, root_zone }
    }

    fn sample_land_cover(&self, bounds: &GeoBounds, range: &DateRange) -> Vec<ClassArea> {
        let center = bounds.center();
        let vegetation = self.expected_index(&center, range).clamp(0.0, 1.0);
        let total_m2 = area_km2(bounds) * 1_000_000.0;

        // Greener places skew toward trees/grass/crops, drier ones toward bare ground.
        let weights: Vec<f64> = COVER_WEIGHTS
            .iter()
            .enumerate()
            .map(|(code, base)| {
                let skew = match LandCoverClass::from_code(code as i64) {
                    LandCoverClass::Trees | LandCoverClass::Grass | LandCoverClass::Crops => {
                        0.5 + vegetation
                    }
                    LandCoverClass::Bare | LandCoverClass::ShrubScrub => 1.5 - vegetation,
                    _ => 1.0,
                };
                base * skew * self.uniform(0.5, 1.5)
            })
            .collect();
        let sum: f64 = weights.iter().sum();

        weights
            .iter()
            .enumerate()
            .map(|(code, w)| ClassArea {
                code: code as i64,
                area_m2: if sum > 0.0 { total_m2 * w / sum } else { 0.0 },
            })
            .collect()
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageryBackend for SimulatedBackend {
    async fn index_stats(&self, query: &IndexQuery) -> Result<IndexStats, BackendError> {
        Ok(self.sample_stats(&query.region.center(), &query.range))
    }

    async fn vegetation_composite(
        &self,
        point: &GeoPoint,
        range: &DateRange,
    ) -> Result<ScaledComposite, BackendError> {
        Ok(self.sample_composite(point, range))
    }

    async fn soil_moisture(
        &self,
        point: &GeoPoint,
        range: &DateRange,
    ) -> Result<MoistureReading, BackendError> {
        Ok(self.sample_moisture(point, range))
    }

    async fn land_cover(
        &self,
        bounds: &GeoBounds,
        range: &DateRange,
    ) -> Result<Vec<ClassArea>, BackendError> {
        Ok(self.sample_land_cover(bounds, range))
    }

    fn source(&self) -> DataSource {
        DataSource::Simulated
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
