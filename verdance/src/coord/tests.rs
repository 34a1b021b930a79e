//! Tests for geographic primitives and validation

use super::*;
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_point_accepts_extremes() {
    assert!(GeoPoint::new(90.0, 180.0).is_ok());
    assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    assert!(GeoPoint::new(-27.47, 153.02).is_ok());
}

#[test]
fn test_point_rejects_out_of_range() {
    assert_eq!(
        GeoPoint::new(90.5, 0.0),
        Err(ValidationError::InvalidLatitude(90.5))
    );
    assert_eq!(
        GeoPoint::new(0.0, -180.1),
        Err(ValidationError::InvalidLongitude(-180.1))
    );
}

#[test]
fn test_point_rejects_nan() {
    assert!(matches!(
        GeoPoint::new(f64::NAN, 0.0),
        Err(ValidationError::InvalidLatitude(_))
    ));
}

#[test]
fn test_bounds_require_ordering() {
    assert!(GeoBounds::new(-27.0, -28.0, 153.5, 152.5).is_ok());
    assert!(matches!(
        GeoBounds::new(-28.0, -27.0, 153.5, 152.5),
        Err(ValidationError::InvalidBounds(_))
    ));
    assert!(matches!(
        GeoBounds::new(-27.0, -28.0, 152.5, 153.5),
        Err(ValidationError::InvalidBounds(_))
    ));
    // Degenerate rectangles are rejected too
    assert!(GeoBounds::new(10.0, 10.0, 5.0, 4.0).is_err());
}

#[test]
fn test_bounds_center_and_contains() {
    let bounds = GeoBounds::new(-27.0, -28.0, 153.5, 152.5).unwrap();
    let center = bounds.center();
    assert!((center.lat - -27.5).abs() < 1e-12);
    assert!((center.lng - 153.0).abs() < 1e-12);
    assert!(bounds.contains(&center));
    assert!(!bounds.contains(&GeoPoint {
        lat: -26.0,
        lng: 153.0
    }));
}

#[test]
fn test_date_range_ordering() {
    assert!(DateRange::new(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
    assert_eq!(
        DateRange::new(date(2024, 2, 1), date(2024, 1, 1)),
        Err(ValidationError::InvalidDateRange {
            start: date(2024, 2, 1),
            end: date(2024, 1, 1)
        })
    );
}

#[test]
fn test_trailing_windows() {
    let range = DateRange::trailing_days(date(2024, 3, 31), 30);
    assert_eq!(range.start, date(2024, 3, 1));
    assert_eq!(range.days(), 30);

    let range = DateRange::trailing_months(date(2024, 8, 31), 6);
    assert_eq!(range.start, date(2024, 2, 29));
    assert_eq!(range.end, date(2024, 8, 31));
}

#[test]
fn test_radius_limits() {
    assert_eq!(validate_radius(100.0), Ok(100.0));
    assert_eq!(validate_radius(10_000.0), Ok(10_000.0));
    assert!(validate_radius(99.9).is_err());
    assert!(validate_radius(10_000.1).is_err());
    assert!(validate_radius(f64::NAN).is_err());
}

#[test]
fn test_months_and_years_limits() {
    assert!(validate_months(0).is_err());
    assert_eq!(validate_months(1), Ok(1));
    assert_eq!(validate_months(24), Ok(24));
    assert!(validate_months(25).is_err());

    assert!(validate_years(0).is_err());
    assert_eq!(validate_years(5), Ok(5));
    assert!(validate_years(6).is_err());
}

#[test]
fn test_buffer_bounds_size() {
    let center = GeoPoint { lat: 0.0, lng: 0.0 };
    let bounds = buffer_bounds(&center, 1_000.0);

    // ~0.009 degrees per km at the equator
    assert!((bounds.north - 0.008993).abs() < 1e-5);
    assert!((bounds.east - 0.008993).abs() < 1e-5);
    assert!(bounds.contains(&center));
}

#[test]
fn test_buffer_bounds_widen_with_latitude() {
    let equator = buffer_bounds(&GeoPoint { lat: 0.0, lng: 10.0 }, 5_000.0);
    let north = buffer_bounds(&GeoPoint { lat: 60.0, lng: 10.0 }, 5_000.0);

    let equator_width = equator.east - equator.west;
    let north_width = north.east - north.west;
    assert!((north_width / equator_width - 2.0).abs() < 0.01);
}

#[test]
fn test_buffer_bounds_clamped_at_pole() {
    let bounds = buffer_bounds(&GeoPoint { lat: 90.0, lng: 0.0 }, 10_000.0);
    assert_eq!(bounds.north, MAX_LAT);
    assert!(bounds.validate().is_ok());
}

#[test]
fn test_area_of_one_degree_cell_at_equator() {
    let bounds = GeoBounds::new(1.0, 0.0, 1.0, 0.0).unwrap();
    let area = area_km2(&bounds);
    // ~12,364 km² for a 1°×1° cell at the equator
    assert!((area - 12_364.0).abs() < 20.0, "area was {}", area);
}

#[test]
fn test_query_region_bounds() {
    let center = GeoPoint::new(-27.0, 153.0).unwrap();
    let region = QueryRegion::buffer(center, 500.0);
    assert_eq!(region.center(), center);
    assert!(region.bounds().contains(&center));

    let rect = GeoBounds::new(-27.0, -28.0, 153.5, 152.5).unwrap();
    assert_eq!(QueryRegion::rectangle(rect).bounds(), rect);
}

#[test]
fn test_m2_to_km2() {
    assert_eq!(m2_to_km2(2_500_000.0), 2.5);
}
