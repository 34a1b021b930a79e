//! Multi-year index history and its direction.

use super::combinators::best_effort;
use super::index::IndexCalculator;
use crate::backend::{BackendError, DataSource, ImageryBackend};
use crate::classify::Trend;
use crate::coord::{DateRange, GeoPoint, QueryRegion};
use crate::indices::series_trend;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default history length, in years.
pub const DEFAULT_TREND_YEARS: u32 = 2;

/// Samples taken per year.
pub const SAMPLES_PER_YEAR: u32 = 4;

/// Months between consecutive samples.
const SAMPLE_STEP_MONTHS: u32 = 12 / SAMPLES_PER_YEAR;

/// Length of each sample window, in months.
const SAMPLE_WINDOW_MONTHS: u32 = 1;

/// One sampled index value, dated by the end of its window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub index_value: f64,
}

/// Chronological series with its classified direction.
///
/// `points` may be shorter than `requested` when samples failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub points: Vec<TrendPoint>,
    pub trend: Trend,
    pub requested: usize,
    pub source: DataSource,
}

impl TrendSeries {
    /// Number of requested samples that were skipped.
    pub fn skipped(&self) -> usize {
        self.requested.saturating_sub(self.points.len())
    }
}

/// Quarterly sample windows for `years`, newest first, walking back from
/// `today`.
pub fn sample_windows(today: NaiveDate, years: u32) -> Vec<DateRange> {
    (0..years * SAMPLES_PER_YEAR)
        .map(|i| {
            let end = today
                .checked_sub_months(Months::new(i * SAMPLE_STEP_MONTHS))
                .unwrap_or(NaiveDate::MIN);
            DateRange::trailing_months(end, SAMPLE_WINDOW_MONTHS)
        })
        .collect()
}

pub struct TrendEngine<'a, B> {
    calculator: IndexCalculator<'a, B>,
    radius_m: f64,
}

impl<'a, B: ImageryBackend> TrendEngine<'a, B> {
    pub fn new(calculator: IndexCalculator<'a, B>, radius_m: f64) -> Self {
        Self {
            calculator,
            radius_m,
        }
    }

    /// Samples `years` of quarterly history ending on `today`.
    ///
    /// Failed samples are skipped rather than failing the series.
    /// Cancellation is still returned as an error.
    pub async fn sample(
        &self,
        point: GeoPoint,
        years: u32,
        today: NaiveDate,
    ) -> Result<TrendSeries, BackendError> {
        let windows = sample_windows(today, years);
        let requested = windows.len();
        let region = QueryRegion::buffer(point, self.radius_m);

        debug!(lat = point.lat, lng = point.lng, years, requested, "Sampling index history");

        let collected = best_effort(windows, |range| self.calculator.compute(region, range)).await?;

        let mut points: Vec<TrendPoint> = collected
            .into_iter()
            .map(|(range, result)| TrendPoint {
                date: range.end,
                index_value: result.mean,
            })
            .collect();
        points.reverse();

        let values: Vec<f64> = points.iter().map(|p| p.index_value).collect();
        let trend = series_trend(&values);

        info!(
            kept = points.len(),
            requested,
            trend = %trend,
            "Index history sampled"
        );

        Ok(TrendSeries {
            points,
            trend,
            requested,
            source: self.calculator.source(),
        })
    }
}
