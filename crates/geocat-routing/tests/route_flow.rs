//! Full routing flow: load a network, compute a path, reassemble its
//! geometry from the edge ids, as the map client consumes it.

use geocat_core::models::{Geometry, NodeId, RoadEdge};
use geocat_routing::{GraphBuilder, RoutingService};

fn edge(id: u64, source: u64, target: u64, cost: f64, coords: Vec<[f64; 2]>) -> RoadEdge {
    RoadEdge::new(id, source, target, cost, Geometry::line_string(coords))
}

#[test]
fn route_then_reassemble_geometry() {
    let service = RoutingService::new();
    service.reload(
        GraphBuilder::new()
            .add_edges([
                edge(10, 1, 2, 1.0, vec![[0.0, 0.0], [1.0, 0.0]]),
                edge(11, 2, 3, 1.0, vec![[1.0, 0.0], [1.0, 1.0]]),
                edge(12, 1, 3, 5.0, vec![[0.0, 0.0], [1.0, 1.0]]),
            ])
            .build()
            .unwrap(),
    );

    let path = service.shortest_path(NodeId(1), NodeId(3)).unwrap();
    assert!((path.total_cost - 2.0).abs() < 1e-12);
    assert_eq!(path.steps.len(), 2);

    // The client resolves edge ids back into drawable geometry
    let geometry = service.edge_geometry(&path.edge_ids()).unwrap();
    let Geometry::MultiLineString { coordinates } = geometry else {
        panic!("expected MultiLineString");
    };
    assert_eq!(coordinates, vec![
        vec![[0.0, 0.0], [1.0, 0.0]],
        vec![[1.0, 0.0], [1.0, 1.0]],
    ]);

    // The path result carries the same combined geometry
    assert_eq!(path.geometry, Geometry::MultiLineString { coordinates });
}
