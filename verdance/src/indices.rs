//! Vegetation index derivations.
//!
//! Pure functions shared by the live and simulated paths: band math,
//! summary statistics, product rescaling, leaf-area estimation, the composite
//! health score and its threshold alerts, series regression, and the
//! sustainability score with its recommendations.

use crate::classify::{classify_slope, DroughtRisk, MoistureCategory, Trend, VegetationCategory};
use serde::{Deserialize, Serialize};

/// Integer scale factor applied to index values in the composite
/// vegetation-index product.
pub const PRODUCT_SCALE_FACTOR: f64 = 10_000.0;

/// Upper clamp of the leaf-area estimate.
pub const MAX_LEAF_AREA: f64 = 8.0;

/// Index value at or below which the leaf-area estimate is zero.
const LAI_MIN_INDEX: f64 = 0.1;

/// Index saturation point of the leaf-area relation.
const LAI_SATURATION_INDEX: f64 = 0.68;

pub const ALERT_LOW_COVER: &str = "Low vegetation cover";
pub const ALERT_DEGRADATION: &str = "Potential land degradation";
pub const ALERT_STRESS: &str = "Vegetation stress indicators present";

pub const REC_COVER_CROP: &str =
    "Consider cover crops or revegetation to improve ground cover";
pub const REC_WATER_CONSERVATION: &str =
    "Implement water conservation measures to manage drought risk";
pub const REC_IRRIGATION: &str = "Schedule irrigation to relieve very dry surface soil";
pub const REC_FAVORABLE: &str = "Conditions are favorable; maintain current practices";

/// Normalized difference of two bands, `(a - b) / (a + b)`.
///
/// Returns 0 when both reflectances are zero (no-data pixels).
#[inline]
pub fn normalized_difference(a: f64, b: f64) -> f64 {
    let sum = a + b;
    if sum == 0.0 {
        0.0
    } else {
        (a - b) / sum
    }
}

/// Normalized difference vegetation index from near-infrared and red
/// reflectance.
#[inline]
pub fn ndvi(nir: f64, red: f64) -> f64 {
    normalized_difference(nir, red)
}

/// Converts a scaled integer product value back to its floating range.
#[inline]
pub fn rescale(raw: f64) -> f64 {
    raw / PRODUCT_SCALE_FACTOR
}

/// Mean / min / max / standard deviation of an index over an area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl IndexStats {
    /// Computes population statistics over finite samples.
    ///
    /// Non-finite samples are masked. Returns `None` if nothing is left.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let values: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            mean,
            min,
            max,
            std_dev: variance.sqrt(),
        })
    }

    /// True when the statistics are mutually consistent.
    pub fn is_consistent(&self) -> bool {
        self.min <= self.mean && self.mean <= self.max && self.std_dev >= 0.0
    }
}

/// Leaf-area index estimated from a vegetation index value.
///
/// `LAI = -ln((0.69 - min(index, 0.68)) / 0.59) / 0.91`, zero for
/// `index <= 0.1`, clamped to `[0, 8]`.
pub fn leaf_area_index(index: f64) -> f64 {
    if index.is_nan() || index <= LAI_MIN_INDEX {
        return 0.0;
    }
    let capped = index.min(LAI_SATURATION_INDEX);
    let lai = -((0.69 - capped) / 0.59).ln() / 0.91;
    lai.clamp(0.0, MAX_LEAF_AREA)
}

/// Composite 0-100 vegetation health score.
///
/// The primary index contributes up to 60 points (saturating at 0.8) and the
/// secondary index up to 40 points (saturating at 0.6). Each contribution is
/// clamped to its share, so the score stays in range for any input.
pub fn health_score(index: f64, secondary_index: f64) -> u8 {
    let primary = share(index / 0.8) * 60.0;
    let secondary = share(secondary_index / 0.6) * 40.0;
    (primary + secondary).round().clamp(0.0, 100.0) as u8
}

/// Clamps a ratio to `[0, 1]`, mapping NaN to 0.
#[inline]
pub(crate) fn share(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// Threshold alerts for a vegetation reading.
///
/// The checks are independent: a very low index raises both the low-cover and
/// degradation alerts.
pub fn health_alerts(index: f64, secondary_index: f64) -> Vec<String> {
    let mut alerts = Vec::new();
    if index < 0.2 {
        alerts.push(ALERT_LOW_COVER.to_string());
    }
    if index < 0.1 {
        alerts.push(ALERT_DEGRADATION.to_string());
    }
    if secondary_index < 0.1 {
        alerts.push(ALERT_STRESS.to_string());
    }
    alerts
}

/// Ordinary least-squares slope of `values` against their positions `0..n`.
///
/// Zero for fewer than two values.
pub fn regression_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n_f;

    let (mut numerator, mut denominator) = (0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        numerator += dx * (y - mean_y);
        denominator += dx * dx;
    }
    numerator / denominator
}

/// Direction of a chronological index series.
pub fn series_trend(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::Stable;
    }
    classify_slope(regression_slope(values))
}

/// Composite 0-100 sustainability score.
///
/// Vegetation cover (saturating at a mean index of 0.6) and the health score
/// contribute up to 35 points each; moisture contributes 30 points less the
/// drought penalty.
pub fn sustainability_score(index_mean: f64, health_score: u8, risk: DroughtRisk) -> u8 {
    let cover = share(index_mean / 0.6) * 35.0;
    let health = f64::from(health_score.min(100)) / 100.0 * 35.0;
    let moisture = 30.0 - risk.penalty();
    (cover + health + moisture).round().clamp(0.0, 100.0) as u8
}

/// Ordered recommendations for an assessment.
///
/// Cover advice comes first, then water conservation, then irrigation, then
/// the health alerts verbatim. An otherwise empty list gets a single
/// favorable-conditions message.
pub fn recommendations(
    category: VegetationCategory,
    risk: DroughtRisk,
    moisture: MoistureCategory,
    alerts: &[String],
) -> Vec<String> {
    let mut recs = Vec::new();
    if matches!(category, VegetationCategory::Poor | VegetationCategory::Bare) {
        recs.push(REC_COVER_CROP.to_string());
    }
    if risk.is_elevated() {
        recs.push(REC_WATER_CONSERVATION.to_string());
    }
    if moisture == MoistureCategory::VeryDry {
        recs.push(REC_IRRIGATION.to_string());
    }
    recs.extend(alerts.iter().cloned());
    if recs.is_empty() {
        recs.push(REC_FAVORABLE.to_string());
    }
    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_difference() {
        assert!((ndvi(0.5, 0.1) - 0.6666667).abs() < 1e-6);
        assert_eq!(ndvi(0.0, 0.0), 0.0);
        assert_eq!(ndvi(0.3, 0.3), 0.0);
        assert!(ndvi(0.1, 0.5) < 0.0);
    }

    #[test]
    fn test_rescale_product_values() {
        assert!((rescale(6543.0) - 0.6543).abs() < 1e-12);
        assert!((rescale(-2000.0) - -0.2).abs() < 1e-12);
    }

    #[test]
    fn test_stats_from_samples() {
        let stats = IndexStats::from_samples(&[0.2, 0.4, 0.6, 0.8]).unwrap();
        assert!((stats.mean - 0.5).abs() < 1e-12);
        assert_eq!(stats.min, 0.2);
        assert_eq!(stats.max, 0.8);
        assert!((stats.std_dev - 0.2236068).abs() < 1e-6);
        assert!(stats.is_consistent());
    }

    #[test]
    fn test_stats_mask_non_finite() {
        let stats = IndexStats::from_samples(&[f64::NAN, 0.5, f64::INFINITY]).unwrap();
        assert_eq!(stats.mean, 0.5);
        assert_eq!(stats.std_dev, 0.0);
        assert!(IndexStats::from_samples(&[f64::NAN]).is_none());
        assert!(IndexStats::from_samples(&[]).is_none());
    }

    #[test]
    fn test_lai_zero_at_or_below_threshold() {
        assert_eq!(leaf_area_index(0.1), 0.0);
        assert_eq!(leaf_area_index(0.05), 0.0);
        assert_eq!(leaf_area_index(-0.5), 0.0);
        assert_eq!(leaf_area_index(f64::NAN), 0.0);
    }

    #[test]
    fn test_lai_known_values() {
        // index 0.5: -ln(0.19 / 0.59) / 0.91
        let expected = -(0.19_f64 / 0.59).ln() / 0.91;
        assert!((leaf_area_index(0.5) - expected).abs() < 1e-12);
        assert!((leaf_area_index(0.5) - 1.2453).abs() < 1e-3);
    }

    #[test]
    fn test_lai_non_decreasing_and_bounded() {
        let mut previous = 0.0;
        for i in 101..=1000 {
            let index = i as f64 / 1000.0;
            let lai = leaf_area_index(index);
            assert!(lai >= previous, "LAI decreased at index {}", index);
            assert!((0.0..=MAX_LEAF_AREA).contains(&lai));
            previous = lai;
        }
        // Saturates above 0.68
        assert_eq!(leaf_area_index(0.68), leaf_area_index(5.0));
        assert!(leaf_area_index(1e9) <= MAX_LEAF_AREA);
    }

    #[test]
    fn test_health_score_formula() {
        // 0.4/0.8 * 60 + 0.3/0.6 * 40 = 30 + 20
        assert_eq!(health_score(0.4, 0.3), 50);
        assert_eq!(health_score(0.8, 0.6), 100);
        assert_eq!(health_score(0.0, 0.0), 0);
        // 0.6/0.8*60 = 45, 0.15/0.6*40 = 10
        assert_eq!(health_score(0.6, 0.15), 55);
    }

    #[test]
    fn test_health_score_clamped_for_large_inputs() {
        assert_eq!(health_score(5.0, 9.0), 100);
        assert_eq!(health_score(f64::INFINITY, 0.0), 60);
        for i in 0..200 {
            for j in 0..200 {
                let score = health_score(i as f64 / 50.0, j as f64 / 50.0);
                assert!(score <= 100);
            }
        }
    }

    #[test]
    fn test_health_score_negative_inputs_floor_at_zero() {
        assert_eq!(health_score(-0.3, -0.2), 0);
        assert_eq!(health_score(f64::NAN, 0.6), 40);
    }

    #[test]
    fn test_alerts_are_additive() {
        assert!(health_alerts(0.5, 0.3).is_empty());
        assert_eq!(health_alerts(0.15, 0.3), vec![ALERT_LOW_COVER]);
        assert_eq!(
            health_alerts(0.05, 0.05),
            vec![ALERT_LOW_COVER, ALERT_DEGRADATION, ALERT_STRESS]
        );
        assert_eq!(health_alerts(0.5, 0.05), vec![ALERT_STRESS]);
    }

    #[test]
    fn test_slope_of_short_and_constant_series() {
        assert_eq!(regression_slope(&[]), 0.0);
        assert_eq!(regression_slope(&[0.4]), 0.0);
        assert_eq!(regression_slope(&[0.3, 0.3, 0.3, 0.3]), 0.0);
        assert_eq!(series_trend(&[0.9]), Trend::Stable);
        assert_eq!(series_trend(&[0.5, 0.5, 0.5]), Trend::Stable);
    }

    #[test]
    fn test_slope_of_linear_series() {
        let rising = [0.1, 0.2, 0.3, 0.4, 0.5];
        assert!((regression_slope(&rising) - 0.1).abs() < 1e-12);
        assert_eq!(series_trend(&rising), Trend::Improving);

        let falling = [0.5, 0.45, 0.4, 0.35];
        assert!((regression_slope(&falling) + 0.05).abs() < 1e-12);
        assert_eq!(series_trend(&falling), Trend::Declining);

        // Strictly increasing but below the threshold
        assert_eq!(series_trend(&[0.400, 0.405, 0.410]), Trend::Stable);
    }

    #[test]
    fn test_sustainability_score_formula() {
        // 35 + 35 + 30
        assert_eq!(sustainability_score(0.6, 100, DroughtRisk::Low), 100);
        // 0.3/0.6*35 = 17.5, 50/100*35 = 17.5, 30 - 15 = 15
        assert_eq!(sustainability_score(0.3, 50, DroughtRisk::High), 50);
        assert_eq!(sustainability_score(-0.2, 0, DroughtRisk::Severe), 0);
        assert_eq!(sustainability_score(2.0, 255, DroughtRisk::Moderate), 95);
    }

    #[test]
    fn test_recommendation_order() {
        let alerts = vec![ALERT_LOW_COVER.to_string(), ALERT_DEGRADATION.to_string()];
        let recs = recommendations(
            VegetationCategory::Bare,
            DroughtRisk::Severe,
            MoistureCategory::VeryDry,
            &alerts,
        );
        assert_eq!(
            recs,
            vec![
                REC_COVER_CROP,
                REC_WATER_CONSERVATION,
                REC_IRRIGATION,
                ALERT_LOW_COVER,
                ALERT_DEGRADATION,
            ]
        );
    }

    #[test]
    fn test_recommendations_favorable_when_nothing_applies() {
        let recs = recommendations(
            VegetationCategory::Good,
            DroughtRisk::Moderate,
            MoistureCategory::Moist,
            &[],
        );
        assert_eq!(recs, vec![REC_FAVORABLE]);

        let recs = recommendations(
            VegetationCategory::Excellent,
            DroughtRisk::Low,
            MoistureCategory::Wet,
            &[ALERT_STRESS.to_string()],
        );
        assert_eq!(recs, vec![ALERT_STRESS]);
    }
}
