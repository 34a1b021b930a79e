//! Threshold classification tables.
//!
//! Every tiered classification in the engine is an ordered table of
//! `(lower bound, tier)` rows, scanned from the highest bound down. The first
//! row whose bound is `<=` the value wins; values below every bound fall into
//! the table's floor tier. This makes each classification total over the real
//! line, with boundary values resolving to the higher tier.
//!
//! The live and simulated backends share these tables, so a simulated value
//! and a live value with the same magnitude always receive the same label.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered boundary table mapping a continuous value to a discrete tier.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdTable<T: Copy + 'static> {
    /// `(inclusive lower bound, tier)` rows in strictly descending bound order.
    rows: &'static [(f64, T)],
    /// Tier for values below the last bound, and for NaN.
    floor: T,
}

impl<T: Copy + 'static> ThresholdTable<T> {
    pub const fn new(rows: &'static [(f64, T)], floor: T) -> Self {
        Self { rows, floor }
    }

    /// Classifies `value`. NaN falls through to the floor tier.
    pub fn classify(&self, value: f64) -> T {
        self.rows
            .iter()
            .find(|(bound, _)| value >= *bound)
            .map(|(_, tier)| *tier)
            .unwrap_or(self.floor)
    }

    /// The boundary rows, highest first.
    pub fn rows(&self) -> &'static [(f64, T)] {
        self.rows
    }

    pub fn floor(&self) -> T {
        self.floor
    }
}

/// Vegetation density class derived from the mean index value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VegetationCategory {
    Excellent,
    Good,
    Moderate,
    Poor,
    Bare,
}

impl VegetationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Poor => "poor",
            Self::Bare => "bare",
        }
    }
}

/// Surface soil moisture class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoistureCategory {
    Saturated,
    Wet,
    Moist,
    Dry,
    VeryDry,
}

impl MoistureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saturated => "saturated",
            Self::Wet => "wet",
            Self::Moist => "moist",
            Self::Dry => "dry",
            Self::VeryDry => "very_dry",
        }
    }
}

/// Agricultural drought severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DroughtRisk {
    Low,
    Moderate,
    High,
    Severe,
}

impl DroughtRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Severe => "severe",
        }
    }

    /// Points deducted from the 30-point moisture share of the
    /// sustainability score.
    pub fn penalty(&self) -> f64 {
        match self {
            Self::Low => 0.0,
            Self::Moderate => 5.0,
            Self::High => 15.0,
            Self::Severe => 30.0,
        }
    }

    /// True for the tiers that warrant water-conservation advice.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::High | Self::Severe)
    }
}

/// Direction of a vegetation index series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

macro_rules! impl_display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

impl_display_as_str!(VegetationCategory, MoistureCategory, DroughtRisk, LandCoverClass, Trend);

/// Mean index → vegetation category.
pub const VEGETATION_TIERS: ThresholdTable<VegetationCategory> = ThresholdTable::new(
    &[
        (0.6, VegetationCategory::Excellent),
        (0.4, VegetationCategory::Good),
        (0.2, VegetationCategory::Moderate),
        (0.1, VegetationCategory::Poor),
    ],
    VegetationCategory::Bare,
);

/// Surface volumetric moisture fraction → moisture category.
pub const MOISTURE_TIERS: ThresholdTable<MoistureCategory> = ThresholdTable::new(
    &[
        (0.4, MoistureCategory::Saturated),
        (0.3, MoistureCategory::Wet),
        (0.2, MoistureCategory::Moist),
        (0.1, MoistureCategory::Dry),
    ],
    MoistureCategory::VeryDry,
);

/// Mean of surface and root-zone moisture → drought risk.
pub const DROUGHT_TIERS: ThresholdTable<DroughtRisk> = ThresholdTable::new(
    &[
        (0.3, DroughtRisk::Low),
        (0.2, DroughtRisk::Moderate),
        (0.1, DroughtRisk::High),
    ],
    DroughtRisk::Severe,
);

/// Classifies a mean vegetation index value.
pub fn categorize_index(mean: f64) -> VegetationCategory {
    VEGETATION_TIERS.classify(mean)
}

/// Classifies a surface moisture fraction.
pub fn categorize_moisture(surface: f64) -> MoistureCategory {
    MOISTURE_TIERS.classify(surface)
}

/// Classifies drought risk from the two moisture readings.
pub fn drought_risk(surface: f64, root_zone: f64) -> DroughtRisk {
    drought_risk_from_average((surface + root_zone) / 2.0)
}

/// Classifies drought risk from an already averaged moisture value.
pub fn drought_risk_from_average(average: f64) -> DroughtRisk {
    DROUGHT_TIERS.classify(average)
}

/// Per-sample slope beyond which a series counts as moving.
pub const TREND_SLOPE_THRESHOLD: f64 = 0.01;

/// Classifies a regression slope. Both bounds are strict; NaN is stable.
pub fn classify_slope(slope: f64) -> Trend {
    if slope > TREND_SLOPE_THRESHOLD {
        Trend::Improving
    } else if slope < -TREND_SLOPE_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Semantic land-cover class.
///
/// Codes 0-8 follow the nine-class scheme of the land-cover product; any
/// other code is kept in [`LandCoverClass::Unknown`] instead of being dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandCoverClass {
    Water,
    Trees,
    Grass,
    FloodedVegetation,
    Crops,
    ShrubScrub,
    Built,
    Bare,
    SnowIce,
    Unknown,
}

impl LandCoverClass {
    /// The nine known classes, in product code order.
    pub const KNOWN: [LandCoverClass; 9] = [
        Self::Water,
        Self::Trees,
        Self::Grass,
        Self::FloodedVegetation,
        Self::Crops,
        Self::ShrubScrub,
        Self::Built,
        Self::Bare,
        Self::SnowIce,
    ];

    /// Maps a numeric product code to its class.
    pub fn from_code(code: i64) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::KNOWN.get(i).copied())
            .unwrap_or(Self::Unknown)
    }

    /// Product code, or `None` for [`LandCoverClass::Unknown`].
    pub fn code(&self) -> Option<u8> {
        Self::KNOWN
            .iter()
            .position(|c| c == self)
            .map(|i| i as u8)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Trees => "trees",
            Self::Grass => "grass",
            Self::FloodedVegetation => "flooded_vegetation",
            Self::Crops => "crops",
            Self::ShrubScrub => "shrub_scrub",
            Self::Built => "built",
            Self::Bare => "bare",
            Self::SnowIce => "snow_ice",
            Self::Unknown => "unknown",
        }
    }
}
