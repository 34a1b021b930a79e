//! Land-cover composition over a rectangle.

use super::combinators::CallPolicy;
use crate::backend::{BackendError, ClassArea, DataSource, ImageryBackend};
use crate::classify::LandCoverClass;
use crate::coord::{m2_to_km2, DateRange, GeoBounds};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Composite window for the modal label, in months.
pub const LAND_COVER_WINDOW_MONTHS: u32 = 3;

/// Area per land-cover class, in km².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandCoverComposition {
    pub classes: BTreeMap<LandCoverClass, f64>,
    pub total_km2: f64,
    pub timestamp: DateTime<Utc>,
    pub source: DataSource,
}

impl LandCoverComposition {
    /// Builds a composition from per-code areas in m².
    ///
    /// Codes outside the known scheme are summed under
    /// [`LandCoverClass::Unknown`].
    pub fn from_areas(areas: &[ClassArea], source: DataSource) -> Self {
        let mut classes = BTreeMap::new();
        for area in areas {
            let class = LandCoverClass::from_code(area.code);
            if class == LandCoverClass::Unknown {
                warn!(code = area.code, "Unknown land-cover code");
            }
            *classes.entry(class).or_insert(0.0) += m2_to_km2(area.area_m2.max(0.0));
        }
        let total_km2 = classes.values().sum();

        Self {
            classes,
            total_km2,
            timestamp: Utc::now(),
            source,
        }
    }

    /// Area of one class, zero if absent.
    pub fn area_km2(&self, class: LandCoverClass) -> f64 {
        self.classes.get(&class).copied().unwrap_or(0.0)
    }

    /// Share of the total covered by `class`, in `[0, 1]`.
    pub fn fraction(&self, class: LandCoverClass) -> f64 {
        if self.total_km2 > 0.0 {
            self.area_km2(class) / self.total_km2
        } else {
            0.0
        }
    }

    /// Class with the largest area.
    pub fn dominant(&self) -> Option<LandCoverClass> {
        self.classes
            .iter()
            .filter(|(_, area)| **area > 0.0)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(class, _)| *class)
    }
}

pub struct LandCoverClassifier<'a, B> {
    backend: &'a B,
    policy: &'a CallPolicy,
}

impl<'a, B: ImageryBackend> LandCoverClassifier<'a, B> {
    pub fn new(backend: &'a B, policy: &'a CallPolicy) -> Self {
        Self { backend, policy }
    }

    /// Classifies `bounds` over the three months ending on `today`.
    pub async fn classify(
        &self,
        bounds: GeoBounds,
        today: NaiveDate,
    ) -> Result<LandCoverComposition, BackendError> {
        let range = DateRange::trailing_months(today, LAND_COVER_WINDOW_MONTHS);
        debug!(
            north = bounds.north,
            south = bounds.south,
            east = bounds.east,
            west = bounds.west,
            "Classifying land cover"
        );

        let areas = self
            .policy
            .run(self.backend.land_cover(&bounds, &range))
            .await?;
        Ok(LandCoverComposition::from_areas(&areas, self.backend.source()))
    }
}
