//! Exact spatial predicates and measures.
//!
//! These operate on geometry values only and know nothing about the index;
//! the store composes them with broad-phase candidates.

use geo::algorithm::centroid::Centroid;
use geo::algorithm::contains::Contains;
use geo::algorithm::intersects::Intersects;
use geo::{Area, Distance, Euclidean, GeodesicArea, Geometry as GeoGeometry, Haversine, Point};

use geocat_core::error::{GeocatError, Result};
use geocat_core::models::{DistanceMode, Geometry};

use crate::convert::to_geo_geometry;
use crate::validation::validate_geometry;

/// True when `a` lies entirely within `b`.
pub fn within(a: &Geometry, b: &Geometry) -> bool {
    let geo_a = to_geo_geometry(a);
    let geo_b = to_geo_geometry(b);
    geo_b.contains(&geo_a)
}

/// True when the two geometries share any point.
///
/// Degenerate geometries never intersect anything; this reports `false`
/// rather than erroring.
pub fn intersects(a: &Geometry, b: &Geometry) -> bool {
    let geo_a = to_geo_geometry(a);
    let geo_b = to_geo_geometry(b);
    geo_a.intersects(&geo_b)
}

/// Area of a polygonal geometry.
///
/// Planar mode uses the shoelace formula; geodesic mode measures on the
/// ellipsoid. A polygon with a self-intersecting exterior ring is an
/// error, not a silently wrong number.
pub fn area(geometry: &Geometry, geodesic: bool) -> Result<f64> {
    validate_geometry(geometry)?;

    match to_geo_geometry(geometry) {
        GeoGeometry::Polygon(p) => {
            Ok(if geodesic { p.geodesic_area_unsigned() } else { p.unsigned_area() })
        }
        GeoGeometry::MultiPolygon(mp) => {
            Ok(if geodesic { mp.geodesic_area_unsigned() } else { mp.unsigned_area() })
        }
        _ => Err(GeocatError::invalid_geometry("area is defined for polygons")),
    }
}

/// Distance between two geometries in the given measurement mode.
///
/// Point-to-point is exact; other geometry pairs measure between centroids.
/// Returns `None` when a centroid cannot be computed (empty geometry).
pub fn distance(a: &Geometry, b: &Geometry, mode: DistanceMode) -> Option<f64> {
    let geo_a = to_geo_geometry(a);
    let geo_b = to_geo_geometry(b);

    match (&geo_a, &geo_b) {
        (GeoGeometry::Point(p1), GeoGeometry::Point(p2)) => Some(point_distance(*p1, *p2, mode)),
        _ => {
            let c1: Point = geo_a.centroid()?;
            let c2: Point = geo_b.centroid()?;
            Some(point_distance(c1, c2, mode))
        }
    }
}

fn point_distance(p1: Point, p2: Point, mode: DistanceMode) -> f64 {
    match mode {
        DistanceMode::Planar => Euclidean.distance(p1, p2),
        DistanceMode::Geodesic => Haversine.distance(p1, p2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::to_geo_geometry;

    fn unit_square() -> Geometry {
        Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [0.0, 4.0],
            [4.0, 4.0],
            [4.0, 0.0],
            [0.0, 0.0],
        ]])
    }

    #[test]
    fn test_point_within_polygon() {
        let square = unit_square();
        assert!(within(&Geometry::point(2.0, 2.0), &square));
        assert!(!within(&Geometry::point(5.0, 5.0), &square));
    }

    #[test]
    fn test_centroid_is_within_its_polygon() {
        let square = unit_square();
        let centroid = to_geo_geometry(&square).centroid().unwrap();
        assert!(within(&Geometry::point(centroid.x(), centroid.y()), &square));
    }

    #[test]
    fn test_polygon_within_polygon() {
        let outer = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [10.0, 0.0],
            [10.0, 10.0],
            [0.0, 10.0],
            [0.0, 0.0],
        ]]);
        let inner = Geometry::polygon(vec![vec![
            [2.0, 2.0],
            [4.0, 2.0],
            [4.0, 4.0],
            [2.0, 4.0],
            [2.0, 2.0],
        ]]);

        assert!(within(&inner, &outer));
        assert!(!within(&outer, &inner));
    }

    #[test]
    fn test_overlapping_polygons_intersect() {
        let a = unit_square();
        let b = Geometry::polygon(vec![vec![
            [2.0, 2.0],
            [6.0, 2.0],
            [6.0, 6.0],
            [2.0, 6.0],
            [2.0, 2.0],
        ]]);
        let far = Geometry::polygon(vec![vec![
            [10.0, 10.0],
            [11.0, 10.0],
            [11.0, 11.0],
            [10.0, 11.0],
            [10.0, 10.0],
        ]]);

        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));
        assert!(!intersects(&a, &far));
    }

    #[test]
    fn test_line_crossing_polygon_intersects() {
        let square = unit_square();
        let crossing = Geometry::line_string(vec![[-1.0, 2.0], [5.0, 2.0]]);
        let missing = Geometry::line_string(vec![[-1.0, 8.0], [5.0, 8.0]]);

        assert!(intersects(&crossing, &square));
        assert!(!intersects(&missing, &square));
    }

    #[test]
    fn test_degenerate_geometry_never_intersects() {
        let empty = Geometry::line_string(vec![]);
        assert!(!intersects(&empty, &unit_square()));
    }

    #[test]
    fn test_planar_area_of_square() {
        let area = area(&unit_square(), false).unwrap();
        assert!((area - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_geodesic_area_is_positive() {
        // Roughly 1km x 1km around the equator
        let cell = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [0.009, 0.0],
            [0.009, 0.009],
            [0.0, 0.009],
            [0.0, 0.0],
        ]]);
        let area = area(&cell, true).unwrap();
        // Around one square kilometre, in square metres
        assert!(area > 900_000.0 && area < 1_100_000.0, "unexpected area {}", area);
    }

    #[test]
    fn test_area_of_self_intersecting_polygon_is_an_error() {
        let bowtie = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [4.0, 4.0],
            [4.0, 0.0],
            [0.0, 4.0],
            [0.0, 0.0],
        ]]);
        let err = area(&bowtie, false).unwrap_err();
        assert!(matches!(err, GeocatError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_area_of_line_is_an_error() {
        let line = Geometry::line_string(vec![[0.0, 0.0], [1.0, 1.0]]);
        assert!(area(&line, false).is_err());
    }

    #[test]
    fn test_planar_distance() {
        let a = Geometry::point(0.0, 0.0);
        let b = Geometry::point(3.0, 4.0);
        let d = distance(&a, &b, DistanceMode::Planar).unwrap();
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_geodesic_distance_paris_to_london() {
        let paris = Geometry::point(2.3522, 48.8566);
        let london = Geometry::point(-0.1276, 51.5074);

        let d = distance(&paris, &london, DistanceMode::Geodesic).unwrap();
        // ~344km, give a few km of tolerance
        assert!(d > 339_000.0 && d < 349_000.0, "Paris-London distance {} should be ~344km", d);
    }

    #[test]
    fn test_distance_falls_back_to_centroids() {
        let square = unit_square();
        let point = Geometry::point(2.0, 12.0);
        // Square centroid is (2, 2), so the centroid distance is 10
        let d = distance(&point, &square, DistanceMode::Planar).unwrap();
        assert!((d - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_of_empty_geometry_is_none() {
        let empty = Geometry::line_string(vec![]);
        assert!(distance(&empty, &Geometry::point(0.0, 0.0), DistanceMode::Planar).is_none());
    }
}
