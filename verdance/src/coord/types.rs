//! Geographic and temporal input types.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid latitude range in degrees
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range in degrees
pub const MIN_LNG: f64 = -180.0;
pub const MAX_LNG: f64 = 180.0;

/// Buffer radius limits for point queries, in metres
pub const MIN_RADIUS_M: f64 = 100.0;
pub const MAX_RADIUS_M: f64 = 10_000.0;

/// Composite lookback limits for vegetation health, in months
pub const MIN_MONTHS: u32 = 1;
pub const MAX_MONTHS: u32 = 24;

/// History limits for trend sampling, in years
pub const MIN_YEARS: u32 = 1;
pub const MAX_YEARS: u32 = 5;

/// Input rejected before any backend is contacted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),

    #[error("Invalid radius: {0} m (must be between 100 and 10000)")]
    InvalidRadius(f64),

    #[error("Invalid lookback: {0} months (must be between 1 and 24)")]
    InvalidMonths(u32),

    #[error("Invalid history: {0} years (must be between 1 and 5)")]
    InvalidYears(u32),

    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("Invalid date range: end {end} is before start {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

/// A location on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a validated point.
    pub fn new(lat: f64, lng: f64) -> Result<Self, ValidationError> {
        let point = Self { lat, lng };
        point.validate()?;
        Ok(point)
    }

    /// Checks latitude and longitude ranges. NaN is rejected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_LAT..=MAX_LAT).contains(&self.lat) {
            return Err(ValidationError::InvalidLatitude(self.lat));
        }
        if !(MIN_LNG..=MAX_LNG).contains(&self.lng) {
            return Err(ValidationError::InvalidLongitude(self.lng));
        }
        Ok(())
    }
}

/// An axis-aligned rectangle in decimal degrees.
///
/// Rectangles crossing the antimeridian are not supported: `east` must be
/// greater than `west`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBounds {
    /// Creates validated bounds.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self, ValidationError> {
        let bounds = Self {
            north,
            south,
            east,
            west,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for lat in [self.north, self.south] {
            if !(MIN_LAT..=MAX_LAT).contains(&lat) {
                return Err(ValidationError::InvalidLatitude(lat));
            }
        }
        for lng in [self.east, self.west] {
            if !(MIN_LNG..=MAX_LNG).contains(&lng) {
                return Err(ValidationError::InvalidLongitude(lng));
            }
        }
        if self.north <= self.south {
            return Err(ValidationError::InvalidBounds(format!(
                "north ({}) must be greater than south ({})",
                self.north, self.south
            )));
        }
        if self.east <= self.west {
            return Err(ValidationError::InvalidBounds(format!(
                "east ({}) must be greater than west ({})",
                self.east, self.west
            )));
        }
        Ok(())
    }

    /// Geometric centre of the rectangle.
    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: (self.north + self.south) / 2.0,
            lng: (self.east + self.west) / 2.0,
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && (self.west..=self.east).contains(&point.lng)
    }
}

/// Inclusive calendar date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The `days`-long window ending on `end`.
    ///
    /// Collapses to the single day `end` if `start` would fall before
    /// chrono's representable range.
    pub fn trailing_days(end: NaiveDate, days: u32) -> Self {
        let start = end.checked_sub_days(Days::new(u64::from(days))).unwrap_or(end);
        Self { start, end }
    }

    /// The `months`-long window ending on `end`.
    ///
    /// Falls back to `trailing_days(end, months * 30)` if the month arithmetic
    /// leaves chrono's representable range.
    pub fn trailing_months(end: NaiveDate, months: u32) -> Self {
        match end.checked_sub_months(Months::new(months)) {
            Some(start) => Self { start, end },
            None => Self::trailing_days(end, months * 30),
        }
    }

    /// Length of the window in days.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}
