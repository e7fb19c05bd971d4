//! Property tests for the exchange format and the broad-phase/narrow-phase
//! contract.

use proptest::prelude::*;

use geocat_core::models::{BoundingBox, FeatureId, Geometry};
use geocat_geo::index::SpatialIndex;
use geocat_geo::{bounding_box, intersects};

fn coord() -> impl Strategy<Value = [f64; 2]> {
    (-180.0f64..180.0, -90.0f64..90.0).prop_map(|(x, y)| [x, y])
}

fn geometry() -> impl Strategy<Value = Geometry> {
    prop_oneof![
        coord().prop_map(|c| Geometry::Point { coordinates: c }),
        proptest::collection::vec(coord(), 2..8).prop_map(Geometry::line_string),
        proptest::collection::vec(coord(), 3..8).prop_map(|mut ring| {
            ring.push(ring[0]);
            Geometry::polygon(vec![ring])
        }),
    ]
}

proptest! {
    #[test]
    fn geojson_round_trip_is_exact(geom in geometry()) {
        let value = geom.to_geojson();
        let parsed = Geometry::from_geojson(&value).unwrap();
        prop_assert_eq!(&parsed, &geom);
        prop_assert_eq!(parsed.to_geojson(), value);
    }

    #[test]
    fn broad_phase_is_a_superset_of_exact_intersection(
        points in proptest::collection::vec(coord(), 1..40),
        (qx, qy) in (-170.0f64..170.0, -80.0f64..80.0),
    ) {
        let mut index = SpatialIndex::new();
        let mut features = Vec::new();
        for (i, c) in points.iter().enumerate() {
            let geom = Geometry::Point { coordinates: *c };
            index.insert(FeatureId(i as u64), bounding_box(&geom).unwrap());
            features.push((FeatureId(i as u64), geom));
        }

        let query_rect = Geometry::polygon(vec![vec![
            [qx, qy],
            [qx + 10.0, qy],
            [qx + 10.0, qy + 10.0],
            [qx, qy + 10.0],
            [qx, qy],
        ]]);
        let candidates = index.locate(&bounding_box(&query_rect).unwrap());

        for (id, geom) in &features {
            if intersects(geom, &query_rect) {
                prop_assert!(candidates.contains(id), "broad phase dropped feature {}", id);
            }
        }
    }

    #[test]
    fn nearest_is_nondecreasing_in_box_distance(
        boxes in proptest::collection::vec((coord(), 0.0f64..5.0, 0.0f64..5.0), 1..30),
        origin in coord(),
    ) {
        let mut index = SpatialIndex::new();
        for (i, ([x, y], w, h)) in boxes.iter().enumerate() {
            index.insert(FeatureId(i as u64), BoundingBox::new(*x, *y, x + w, y + h));
        }

        let ordered = index.nearest_with_distance(origin, boxes.len());
        for pair in ordered.windows(2) {
            prop_assert!(pair[0].1 <= pair[1].1);
        }
    }
}
