//! Canonical geometry types used across all geocat crates.
//!
//! The [`Geometry`] enum maps directly onto GeoJSON geometry objects, so
//! serde round-trips the exchange format bit-exact: same vertex order,
//! same ring orientation.

use serde::{Deserialize, Serialize};

use crate::error::{GeocatError, Result};

/// Distance and area measurement mode, fixed process-wide.
///
/// Must match the reference system of the stored geometries: planar for
/// projected coordinates, geodesic for geographic (lon/lat) ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMode {
    /// Euclidean distances, shoelace areas.
    Planar,
    /// Great-circle distances, geodesic areas.
    #[default]
    Geodesic,
}

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

/// GeoJSON-compatible geometry representation
///
/// This enum directly maps to GeoJSON geometry types with coordinate arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { coordinates: [x, y] }
    }

    /// Create a LineString geometry
    pub fn line_string(coords: Vec<[f64; 2]>) -> Self {
        Geometry::LineString { coordinates: coords }
    }

    /// Create a Polygon geometry
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::LineString { .. } => GeometryType::LineString,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPoint { .. } => GeometryType::MultiPoint,
            Geometry::MultiLineString { .. } => GeometryType::MultiLineString,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
        }
    }

    /// Parse a GeoJSON geometry object.
    ///
    /// Structural well-formedness (ring closure, vertex counts, finite
    /// coordinates) is checked separately by the validation layer; this
    /// only rejects values that are not GeoJSON geometry at all.
    pub fn from_geojson(value: &serde_json::Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(|e| GeocatError::InvalidGeometry {
            reason: format!("not a GeoJSON geometry: {}", e),
        })
    }

    /// Serialize to a GeoJSON geometry object.
    pub fn to_geojson(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Axis-aligned bounding box derived from a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Degenerate box covering a single point.
    pub fn from_point(x: f64, y: f64) -> Self {
        Self::new(x, y, x, y)
    }

    /// True when the two boxes overlap in both dimensions (touching counts).
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Planar distance from a point to this box, zero when inside.
    pub fn distance_to(&self, point: [f64; 2]) -> f64 {
        let dx = if point[0] < self.min_x {
            self.min_x - point[0]
        } else if point[0] > self.max_x {
            point[0] - self.max_x
        } else {
            0.0
        };

        let dy = if point[1] < self.min_y {
            self.min_y - point[1]
        } else if point[1] > self.max_y {
            point[1] - self.max_y
        } else {
            0.0
        };

        (dx * dx + dy * dy).sqrt()
    }
}
