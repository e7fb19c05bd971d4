//! Structural geometry validation.
//!
//! Malformed input is rejected, never repaired; callers get the first
//! offending location in the error reason.

use geo::algorithm::intersects::Intersects;
use geo::{Coord, Line};

use geocat_core::error::{GeocatError, Result};
use geocat_core::models::Geometry;

/// Validate a geometry for storage or querying.
///
/// Rejects empty coordinate sequences, non-finite coordinates, too-short
/// linestrings, unclosed or degenerate polygon rings, and polygons whose
/// exterior ring self-intersects.
pub fn validate_geometry(geometry: &Geometry) -> Result<()> {
    match geometry {
        Geometry::Point { coordinates } => validate_coord(coordinates, "Point"),
        Geometry::LineString { coordinates } => validate_line_string(coordinates, "LineString"),
        Geometry::Polygon { coordinates } => validate_polygon(coordinates, "Polygon"),
        Geometry::MultiPoint { coordinates } => {
            if coordinates.is_empty() {
                return Err(GeocatError::invalid_geometry("MultiPoint has no points"));
            }
            for (i, c) in coordinates.iter().enumerate() {
                validate_coord(c, &format!("MultiPoint[{}]", i))?;
            }
            Ok(())
        }
        Geometry::MultiLineString { coordinates } => {
            if coordinates.is_empty() {
                return Err(GeocatError::invalid_geometry("MultiLineString has no parts"));
            }
            for (i, line) in coordinates.iter().enumerate() {
                validate_line_string(line, &format!("MultiLineString[{}]", i))?;
            }
            Ok(())
        }
        Geometry::MultiPolygon { coordinates } => {
            if coordinates.is_empty() {
                return Err(GeocatError::invalid_geometry("MultiPolygon has no parts"));
            }
            for (i, rings) in coordinates.iter().enumerate() {
                validate_polygon(rings, &format!("MultiPolygon[{}]", i))?;
            }
            Ok(())
        }
    }
}

fn validate_coord(coord: &[f64; 2], location: &str) -> Result<()> {
    if !coord[0].is_finite() || !coord[1].is_finite() {
        return Err(GeocatError::InvalidGeometry {
            reason: format!("{}: coordinates must be finite", location),
        });
    }
    Ok(())
}

fn validate_line_string(coords: &[[f64; 2]], location: &str) -> Result<()> {
    if coords.len() < 2 {
        return Err(GeocatError::InvalidGeometry {
            reason: format!("{} must have at least 2 points, found {}", location, coords.len()),
        });
    }
    for (i, c) in coords.iter().enumerate() {
        validate_coord(c, &format!("{}[{}]", location, i))?;
    }
    Ok(())
}

fn validate_polygon(rings: &[Vec<[f64; 2]>], location: &str) -> Result<()> {
    if rings.is_empty() {
        return Err(GeocatError::InvalidGeometry {
            reason: format!("{} has no rings", location),
        });
    }

    for (i, ring) in rings.iter().enumerate() {
        let ring_location = if i == 0 {
            format!("{} exterior", location)
        } else {
            format!("{} interior[{}]", location, i - 1)
        };
        validate_ring(ring, &ring_location)?;
    }

    // Only the exterior is checked for self-intersection; interior rings
    // follow the same closure rules but overlap handling is out of scope.
    if ring_self_intersects(&rings[0]) {
        return Err(GeocatError::InvalidGeometry {
            reason: format!("{} exterior ring self-intersects", location),
        });
    }

    Ok(())
}

fn validate_ring(ring: &[[f64; 2]], location: &str) -> Result<()> {
    if ring.len() < 4 {
        return Err(GeocatError::InvalidGeometry {
            reason: format!("{} must have at least 4 points, found {}", location, ring.len()),
        });
    }
    for (i, c) in ring.iter().enumerate() {
        validate_coord(c, &format!("{}[{}]", location, i))?;
    }
    if ring.first() != ring.last() {
        return Err(GeocatError::InvalidGeometry {
            reason: format!("{} must be closed (first point == last point)", location),
        });
    }

    let mut distinct: Vec<&[f64; 2]> = Vec::with_capacity(ring.len());
    for c in &ring[..ring.len() - 1] {
        if !distinct.contains(&c) {
            distinct.push(c);
        }
    }
    if distinct.len() < 3 {
        return Err(GeocatError::InvalidGeometry {
            reason: format!("{} must have at least 3 distinct vertices", location),
        });
    }

    Ok(())
}

/// Segment-pair sweep over a closed ring. Adjacent segments share a vertex
/// and are skipped, including the closure pair (last segment, first segment).
fn ring_self_intersects(ring: &[[f64; 2]]) -> bool {
    let segments: Vec<Line> = ring
        .windows(2)
        .map(|w| Line::new(Coord { x: w[0][0], y: w[0][1] }, Coord { x: w[1][0], y: w[1][1] }))
        .collect();
    let n = segments.len();

    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                continue;
            }
            if segments[i].intersects(&segments[j]) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Geometry {
        Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [4.0, 0.0],
            [4.0, 4.0],
            [0.0, 4.0],
            [0.0, 0.0],
        ]])
    }

    #[test]
    fn test_valid_geometries_pass() {
        assert!(validate_geometry(&Geometry::point(1.0, 2.0)).is_ok());
        assert!(validate_geometry(&Geometry::line_string(vec![[0.0, 0.0], [1.0, 1.0]])).is_ok());
        assert!(validate_geometry(&square()).is_ok());
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        let err = validate_geometry(&Geometry::point(f64::NAN, 0.0)).unwrap_err();
        assert!(matches!(err, GeocatError::InvalidGeometry { .. }));

        let line = Geometry::line_string(vec![[0.0, 0.0], [f64::INFINITY, 1.0]]);
        assert!(validate_geometry(&line).is_err());
    }

    #[test]
    fn test_short_line_string_rejected() {
        let err = validate_geometry(&Geometry::line_string(vec![[0.0, 0.0]])).unwrap_err();
        assert!(err.to_string().contains("at least 2 points"));
    }

    #[test]
    fn test_empty_sequences_rejected() {
        assert!(validate_geometry(&Geometry::line_string(vec![])).is_err());
        assert!(validate_geometry(&Geometry::polygon(vec![])).is_err());
        assert!(validate_geometry(&Geometry::MultiPoint { coordinates: vec![] }).is_err());
    }

    #[test]
    fn test_unclosed_ring_rejected() {
        let open = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [4.0, 0.0],
            [4.0, 4.0],
            [0.0, 4.0],
        ]]);
        let err = validate_geometry(&open).unwrap_err();
        assert!(err.to_string().contains("closed"));
    }

    #[test]
    fn test_degenerate_ring_rejected() {
        // Closed but only two distinct vertices
        let sliver = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [1.0, 1.0],
            [0.0, 0.0],
            [1.0, 1.0],
            [0.0, 0.0],
        ]]);
        let err = validate_geometry(&sliver).unwrap_err();
        assert!(err.to_string().contains("distinct"));
    }

    #[test]
    fn test_bowtie_exterior_rejected() {
        // Classic self-intersecting "bowtie" ring
        let bowtie = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [4.0, 4.0],
            [4.0, 0.0],
            [0.0, 4.0],
            [0.0, 0.0],
        ]]);
        let err = validate_geometry(&bowtie).unwrap_err();
        assert!(err.to_string().contains("self-intersects"));
    }

    #[test]
    fn test_polygon_with_hole_passes() {
        let with_hole = Geometry::polygon(vec![
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
            vec![[4.0, 4.0], [6.0, 4.0], [6.0, 6.0], [4.0, 6.0], [4.0, 4.0]],
        ]);
        assert!(validate_geometry(&with_hole).is_ok());
    }
}
