//! Wire types for the imagery service compute API.

use super::super::types::BackendError;
use crate::coord::{GeoBounds, GeoPoint, QueryRegion};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An imagery collection and the scale it is reduced at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dataset {
    pub id: &'static str,
    pub scale_m: f64,
}

/// Sentinel-2 surface reflectance, 10 m.
pub const SURFACE_REFLECTANCE: Dataset = Dataset {
    id: "COPERNICUS/S2_SR_HARMONIZED",
    scale_m: 10.0,
};

/// MODIS 16-day vegetation indices, 250 m. Values are scaled by 10 000.
pub const VEGETATION_INDICES: Dataset = Dataset {
    id: "MODIS/061/MOD13Q1",
    scale_m: 250.0,
};

/// SMAP L4 surface and root-zone soil moisture, ~11 km.
pub const SOIL_MOISTURE: Dataset = Dataset {
    id: "NASA/SMAP/SPL4SMGP/007",
    scale_m: 11_000.0,
};

/// Dynamic World near-real-time land cover, 10 m.
pub const LAND_COVER: Dataset = Dataset {
    id: "GOOGLE/DYNAMICWORLD/V1",
    scale_m: 10.0,
};

/// Image property holding the obscured-pixel percentage.
pub const CLOUD_PROPERTY: &str = "CLOUDY_PIXEL_PERCENTAGE";

/// Geometry a reduction runs over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Point { lat: f64, lng: f64 },
    Buffer { lat: f64, lng: f64, radius_m: f64 },
    Rectangle {
        north: f64,
        south: f64,
        east: f64,
        west: f64,
    },
}

impl Geometry {
    pub fn point(point: &GeoPoint) -> Self {
        Self::Point {
            lat: point.lat,
            lng: point.lng,
        }
    }

    pub fn rectangle(bounds: &GeoBounds) -> Self {
        Self::Rectangle {
            north: bounds.north,
            south: bounds.south,
            east: bounds.east,
            west: bounds.west,
        }
    }
}

impl From<&QueryRegion> for Geometry {
    fn from(region: &QueryRegion) -> Self {
        match region {
            QueryRegion::Buffer { center, radius_m } => Self::Buffer {
                lat: center.lat,
                lng: center.lng,
                radius_m: *radius_m,
            },
            QueryRegion::Rectangle { bounds } => Self::rectangle(bounds),
        }
    }
}

/// Per-image property filter, e.g. `CLOUDY_PIXEL_PERCENTAGE < 20`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyFilter {
    pub property: String,
    pub less_than: f64,
}

/// Band math applied to each image before reduction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Expression {
    /// `(positive - negative) / (positive + negative)`, output band `name`.
    NormalizedDifference {
        positive: String,
        negative: String,
        name: String,
    },
    /// Select bands unchanged.
    Select { bands: Vec<String> },
}

/// How the image stack is collapsed over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalReducer {
    Median,
    Mean,
    Mode,
}

/// How pixels are collapsed over the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialReducer {
    Mean,
    Min,
    Max,
    StdDev,
    /// Sum of pixel area grouped by the (single) selected band value.
    GroupedAreaSum,
}

/// Body of `POST /v1/projects/{project}/value:compute`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputeRequest {
    pub dataset: String,
    pub geometry: Geometry,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<PropertyFilter>,
    pub expression: Expression,
    pub temporal_reducer: TemporalReducer,
    pub reducers: Vec<SpatialReducer>,
    pub scale_m: f64,
}

/// One group of a grouped reduction.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GroupValue {
    pub class: i64,
    pub sum: f64,
}

/// Response of the compute call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ComputeResponse {
    #[serde(default)]
    pub result: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub groups: Vec<GroupValue>,
}

impl ComputeResponse {
    /// Decodes a response body.
    pub fn parse(body: &[u8]) -> Result<Self, BackendError> {
        serde_json::from_slice(body)
            .map_err(|e| BackendError::InvalidResponse(format!("Malformed compute response: {}", e)))
    }

    /// Named reduction output.
    ///
    /// A null or absent value means nothing survived the filters (no imagery
    /// in the window, or every frame too cloudy).
    pub fn value(&self, name: &str) -> Result<f64, BackendError> {
        match self.result.get(name) {
            Some(Some(v)) if v.is_finite() => Ok(*v),
            Some(Some(v)) => Err(BackendError::InvalidResponse(format!(
                "Non-finite value for {}: {}",
                name, v
            ))),
            _ => Err(BackendError::MissingValue(name.to_string())),
        }
    }
}

/// Body of `POST /v1/sessions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRequest<'a> {
    pub project_id: &'a str,
    pub client_email: &'a str,
    /// RS256 assertion signed with the account key
    pub assertion: &'a str,
}

/// Response of the session call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionResponse {
    pub session: String,
}
