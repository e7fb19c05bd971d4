use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::Geometry;

/// Unique identifier for a road-network node
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a road edge
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Directed road segment. Immutable once loaded into a graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    /// Traversal cost; must be finite and non-negative.
    pub cost: f64,
    /// Segment geometry; must be a LineString.
    pub geometry: Geometry,
}

impl RoadEdge {
    pub fn new(id: u64, source: u64, target: u64, cost: f64, geometry: Geometry) -> Self {
        Self {
            id: EdgeId(id),
            source: NodeId(source),
            target: NodeId(target),
            cost,
            geometry,
        }
    }
}

/// One traversed edge of a computed route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub edge_id: EdgeId,
    pub cost: f64,
}

/// Ephemeral shortest-path result; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePath {
    /// Traversed edges in path order, empty for a source == target query.
    pub steps: Vec<RouteStep>,
    pub total_cost: f64,
    /// Combined edge geometry as a MultiLineString, one part per step.
    pub geometry: Geometry,
}

impl RoutePath {
    /// Edge ids in path order.
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.steps.iter().map(|s| s.edge_id).collect()
    }
}
