//! Common types and utilities shared across CLI commands.

use chrono::NaiveDate;
use clap::Args;
use verdance::coord::{GeoBounds, GeoPoint};

/// A location given as `--lat` and `--lng`.
#[derive(Debug, Clone, Args)]
pub struct PointArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,
}

impl PointArgs {
    /// The point as given; range checks happen in the engine.
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// A rectangle given by its four edges.
#[derive(Debug, Clone, Args)]
pub struct BoundsArgs {
    /// Northern edge latitude
    #[arg(long, allow_hyphen_values = true)]
    pub north: f64,

    /// Southern edge latitude
    #[arg(long, allow_hyphen_values = true)]
    pub south: f64,

    /// Eastern edge longitude
    #[arg(long, allow_hyphen_values = true)]
    pub east: f64,

    /// Western edge longitude
    #[arg(long, allow_hyphen_values = true)]
    pub west: f64,
}

impl BoundsArgs {
    pub fn bounds(&self) -> GeoBounds {
        GeoBounds {
            north: self.north,
            south: self.south,
            east: self.east,
            west: self.west,
        }
    }
}

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29"),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("29/02/2024").is_err());
    }
}
