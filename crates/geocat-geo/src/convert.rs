//! Conversions between the canonical geometry model and the `geo` crate.

use geo::algorithm::bounding_rect::BoundingRect;
use geo::Geometry as GeoGeometry;

use geocat_core::error::{GeocatError, Result};
use geocat_core::models::{BoundingBox, Geometry};

fn line_string(coords: &[[f64; 2]]) -> geo::LineString {
    geo::LineString::new(coords.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect())
}

fn polygon(rings: &[Vec<[f64; 2]>]) -> geo::Polygon {
    let mut rings = rings.iter();
    let exterior =
        rings.next().map(|r| line_string(r)).unwrap_or_else(|| geo::LineString::new(vec![]));
    geo::Polygon::new(exterior, rings.map(|r| line_string(r)).collect())
}

/// Convert a canonical geometry into a `geo::Geometry` for algorithm use.
pub fn to_geo_geometry(geom: &Geometry) -> GeoGeometry {
    match geom {
        Geometry::Point { coordinates } => {
            GeoGeometry::Point(geo::Point::new(coordinates[0], coordinates[1]))
        }
        Geometry::LineString { coordinates } => GeoGeometry::LineString(line_string(coordinates)),
        Geometry::Polygon { coordinates } => GeoGeometry::Polygon(polygon(coordinates)),
        Geometry::MultiPoint { coordinates } => GeoGeometry::MultiPoint(geo::MultiPoint::new(
            coordinates.iter().map(|c| geo::Point::new(c[0], c[1])).collect(),
        )),
        Geometry::MultiLineString { coordinates } => GeoGeometry::MultiLineString(
            geo::MultiLineString::new(coordinates.iter().map(|l| line_string(l)).collect()),
        ),
        Geometry::MultiPolygon { coordinates } => GeoGeometry::MultiPolygon(
            geo::MultiPolygon::new(coordinates.iter().map(|p| polygon(p)).collect()),
        ),
    }
}

/// Derive the bounding box of a geometry.
///
/// Empty geometries have no extent and are rejected; validation catches
/// them before they reach here.
pub fn bounding_box(geom: &Geometry) -> Result<BoundingBox> {
    let rect = to_geo_geometry(geom)
        .bounding_rect()
        .ok_or_else(|| GeocatError::invalid_geometry("empty geometry has no extent"))?;
    Ok(BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y))
}
