//! Geographic primitives and input validation.
//!
//! Provides the point/rectangle/date-window types every analysis takes as
//! input, the validation limits enforced before any backend call, and the
//! query regions sent to imagery backends.

mod types;

pub use types::{
    DateRange, GeoBounds, GeoPoint, ValidationError, MAX_LAT, MAX_LNG, MAX_MONTHS, MAX_RADIUS_M,
    MAX_YEARS, MIN_LAT, MIN_LNG, MIN_MONTHS, MIN_RADIUS_M, MIN_YEARS,
};

use serde::{Deserialize, Serialize};

/// Mean Earth radius (IUGG) in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Metres per degree of latitude on the mean sphere.
const METRES_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// Area over which an analysis is reduced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryRegion {
    /// Circular buffer around a point.
    Buffer { center: GeoPoint, radius_m: f64 },
    /// Axis-aligned rectangle.
    Rectangle { bounds: GeoBounds },
}

impl QueryRegion {
    pub fn buffer(center: GeoPoint, radius_m: f64) -> Self {
        Self::Buffer { center, radius_m }
    }

    pub fn rectangle(bounds: GeoBounds) -> Self {
        Self::Rectangle { bounds }
    }

    /// Representative point, used by heuristics that need a single location.
    pub fn center(&self) -> GeoPoint {
        match self {
            Self::Buffer { center, .. } => *center,
            Self::Rectangle { bounds } => bounds.center(),
        }
    }

    /// Bounding rectangle of the region.
    pub fn bounds(&self) -> GeoBounds {
        match self {
            Self::Buffer { center, radius_m } => buffer_bounds(center, *radius_m),
            Self::Rectangle { bounds } => *bounds,
        }
    }
}

/// Checks a buffer radius against [`MIN_RADIUS_M`]..=[`MAX_RADIUS_M`].
pub fn validate_radius(radius_m: f64) -> Result<f64, ValidationError> {
    if (MIN_RADIUS_M..=MAX_RADIUS_M).contains(&radius_m) {
        Ok(radius_m)
    } else {
        Err(ValidationError::InvalidRadius(radius_m))
    }
}

/// Checks a lookback window against [`MIN_MONTHS`]..=[`MAX_MONTHS`].
pub fn validate_months(months: u32) -> Result<u32, ValidationError> {
    if (MIN_MONTHS..=MAX_MONTHS).contains(&months) {
        Ok(months)
    } else {
        Err(ValidationError::InvalidMonths(months))
    }
}

/// Checks a trend history length against [`MIN_YEARS`]..=[`MAX_YEARS`].
pub fn validate_years(years: u32) -> Result<u32, ValidationError> {
    if (MIN_YEARS..=MAX_YEARS).contains(&years) {
        Ok(years)
    } else {
        Err(ValidationError::InvalidYears(years))
    }
}

/// Bounding rectangle of a circular buffer, clamped to valid coordinates.
///
/// Uses a local equirectangular approximation, which is accurate to well under
/// a percent at the buffer sizes accepted by [`validate_radius`].
pub fn buffer_bounds(center: &GeoPoint, radius_m: f64) -> GeoBounds {
    let dlat = radius_m / METRES_PER_DEGREE;
    let cos_lat = center.lat.to_radians().cos().max(1e-6);
    let dlng = (radius_m / (METRES_PER_DEGREE * cos_lat)).min(180.0);

    GeoBounds {
        north: (center.lat + dlat).min(MAX_LAT),
        south: (center.lat - dlat).max(MIN_LAT),
        east: (center.lng + dlng).min(MAX_LNG),
        west: (center.lng - dlng).max(MIN_LNG),
    }
}

/// Area of a latitude/longitude rectangle on the mean sphere, in km².
pub fn area_km2(bounds: &GeoBounds) -> f64 {
    let dlng = (bounds.east - bounds.west).to_radians();
    let band = bounds.north.to_radians().sin() - bounds.south.to_radians().sin();
    (EARTH_RADIUS_M * EARTH_RADIUS_M * dlng * band).abs() / 1_000_000.0
}

/// Converts square metres to square kilometres.
#[inline]
pub fn m2_to_km2(m2: f64) -> f64 {
    m2 / 1_000_000.0
}

#[cfg(test)]
mod tests;
