//! Index command - vegetation index statistics for a point or rectangle.

use chrono::NaiveDate;
use clap::Args;
use verdance::coord::{DateRange, GeoBounds, GeoPoint};
use verdance::error::EngineError;

use super::common::parse_date;
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalOptions};

/// Arguments for the index command.
#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true, requires = "lng", required_unless_present = "bounds")]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lng: Option<f64>,

    /// Query a rectangle instead of a buffer around a point
    #[arg(
        long,
        num_args = 4,
        allow_hyphen_values = true,
        value_names = ["NORTH", "SOUTH", "EAST", "WEST"],
        conflicts_with_all = ["lat", "lng", "radius"]
    )]
    pub bounds: Option<Vec<f64>>,

    /// Buffer radius in metres (default from config)
    #[arg(long)]
    pub radius: Option<f64>,

    /// First day of the window (default: 30 days before today)
    #[arg(long, value_parser = parse_date, requires = "end")]
    pub start: Option<NaiveDate>,

    /// Last day of the window
    #[arg(long, value_parser = parse_date, requires = "start")]
    pub end: Option<NaiveDate>,
}

enum Target {
    Point(GeoPoint),
    Bounds(GeoBounds),
}

impl IndexArgs {
    fn target(&self) -> Result<Target, CliError> {
        match (&self.bounds, self.lat, self.lng) {
            (Some(edges), _, _) => match edges.as_slice() {
                [north, south, east, west] => Ok(Target::Bounds(GeoBounds {
                    north: *north,
                    south: *south,
                    east: *east,
                    west: *west,
                })),
                _ => Err(CliError::InvalidArgument(
                    "--bounds takes exactly four values".to_string(),
                )),
            },
            (None, Some(lat), Some(lng)) => Ok(Target::Point(GeoPoint { lat, lng })),
            _ => Err(CliError::InvalidArgument(
                "either --lat/--lng or --bounds is required".to_string(),
            )),
        }
    }

    fn range(&self) -> Result<Option<DateRange>, CliError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => DateRange::new(start, end)
                .map(Some)
                .map_err(|e| CliError::Engine(EngineError::from(e))),
            _ => Ok(None),
        }
    }
}

/// Run the index command.
pub fn run(args: IndexArgs, options: &GlobalOptions) -> Result<(), CliError> {
    let target = args.target()?;
    let range = args.range()?;

    let runner = CliRunner::new(options)?;
    runner.log_startup("index");
    let engine = runner.create_engine();

    let result = runner.block_on(async {
        match target {
            Target::Point(point) => engine.get_index(point, range, args.radius).await,
            Target::Bounds(bounds) => engine.get_index_in_bounds(bounds, range).await,
        }
    })?;

    runner.print_json(&result)
}
