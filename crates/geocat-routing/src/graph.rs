//! Road graph construction and shortest-path search.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

use geocat_core::error::{GeocatError, Result};
use geocat_core::models::{EdgeId, Geometry, NodeId, RoadEdge, RoutePath, RouteStep};
use geocat_geo::validate_geometry;

/// Ordered float for deterministic priority-queue behavior
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
struct OrderedCost(f64);

impl Eq for OrderedCost {}

impl Ord for OrderedCost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

/// Builder for a road graph; all validation happens at build time.
#[derive(Default)]
pub struct GraphBuilder {
    edges: Vec<RoadEdge>,
    declared_nodes: Option<HashSet<NodeId>>,
}

impl GraphBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the full node set. Edges referencing nodes outside it are
    /// rejected at build time; without a declaration edges imply their
    /// endpoints.
    pub fn with_nodes(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.declared_nodes = Some(nodes.into_iter().collect());
        self
    }

    /// Add a road edge
    pub fn add_edge(mut self, edge: RoadEdge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Add multiple road edges
    pub fn add_edges(mut self, edges: impl IntoIterator<Item = RoadEdge>) -> Self {
        self.edges.extend(edges);
        self
    }

    /// Validate the edge set and build the graph
    pub fn build(self) -> Result<RoadGraph> {
        let mut by_id = HashMap::with_capacity(self.edges.len());
        let mut nodes = HashSet::new();

        for (idx, edge) in self.edges.iter().enumerate() {
            if !edge.cost.is_finite() || edge.cost < 0.0 {
                return Err(GeocatError::invalid_graph(format!(
                    "edge {} has invalid cost {}",
                    edge.id, edge.cost
                )));
            }
            if !matches!(edge.geometry, Geometry::LineString { .. }) {
                return Err(GeocatError::invalid_graph(format!(
                    "edge {} geometry must be a LineString",
                    edge.id
                )));
            }
            validate_geometry(&edge.geometry)?;
            if by_id.insert(edge.id, idx).is_some() {
                return Err(GeocatError::invalid_graph(format!("duplicate edge id {}", edge.id)));
            }
            if let Some(declared) = &self.declared_nodes {
                for node in [edge.source, edge.target] {
                    if !declared.contains(&node) {
                        return Err(GeocatError::invalid_graph(format!(
                            "edge {} references undeclared node {}",
                            edge.id, node
                        )));
                    }
                }
            }
            nodes.insert(edge.source);
            nodes.insert(edge.target);
        }

        if let Some(declared) = self.declared_nodes {
            nodes.extend(declared);
        }

        let mut adjacency: HashMap<NodeId, Vec<usize>> = HashMap::new();
        for (idx, edge) in self.edges.iter().enumerate() {
            adjacency.entry(edge.source).or_default().push(idx);
        }

        tracing::debug!(edges = self.edges.len(), nodes = nodes.len(), "built road graph");
        Ok(RoadGraph { edges: self.edges, by_id, adjacency, nodes })
    }
}

/// Immutable directed weighted graph over road edges.
#[derive(Debug)]
pub struct RoadGraph {
    edges: Vec<RoadEdge>,
    by_id: HashMap<EdgeId, usize>,
    adjacency: HashMap<NodeId, Vec<usize>>,
    nodes: HashSet<NodeId>,
}

impl RoadGraph {
    /// Number of edges in the graph
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph knows this node
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Look up an edge by id
    pub fn edge(&self, id: EdgeId) -> Option<&RoadEdge> {
        self.by_id.get(&id).map(|&idx| &self.edges[idx])
    }

    /// Dijkstra shortest path from `source` to `target`.
    ///
    /// Frontier entries are `(accumulated cost, node id)`, so equal-cost
    /// candidates settle in ascending node id order and the result is
    /// deterministic. A `source == target` query is a zero-cost empty path.
    pub fn shortest_path(&self, source: NodeId, target: NodeId) -> Result<RoutePath> {
        if !self.nodes.contains(&source) || !self.nodes.contains(&target) {
            return Err(GeocatError::NoPath { start: source, target });
        }
        if source == target {
            return Ok(RoutePath {
                steps: Vec::new(),
                total_cost: 0.0,
                geometry: Geometry::MultiLineString { coordinates: Vec::new() },
            });
        }

        let mut dist: HashMap<NodeId, f64> = HashMap::new();
        let mut parent: HashMap<NodeId, usize> = HashMap::new();
        let mut settled: HashSet<NodeId> = HashSet::new();
        let mut frontier = BinaryHeap::new();

        dist.insert(source, 0.0);
        frontier.push(Reverse((OrderedCost(0.0), source)));

        let mut total = None;
        while let Some(Reverse((OrderedCost(cost), node))) = frontier.pop() {
            if !settled.insert(node) {
                continue;
            }
            if node == target {
                total = Some(cost);
                break;
            }

            for &edge_idx in self.adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[]) {
                let edge = &self.edges[edge_idx];
                let next = edge.target;
                if settled.contains(&next) {
                    continue;
                }
                let candidate = cost + edge.cost;
                let improved = match dist.get(&next) {
                    Some(&best) => candidate < best,
                    None => true,
                };
                if improved {
                    dist.insert(next, candidate);
                    parent.insert(next, edge_idx);
                    frontier.push(Reverse((OrderedCost(candidate), next)));
                }
            }
        }

        let Some(total_cost) = total else {
            return Err(GeocatError::NoPath { start: source, target });
        };

        // Walk parent pointers back from the target
        let mut edge_indices = Vec::new();
        let mut node = target;
        while node != source {
            match parent.get(&node) {
                Some(&edge_idx) => {
                    edge_indices.push(edge_idx);
                    node = self.edges[edge_idx].source;
                }
                // Unreachable once the target has been settled
                None => return Err(GeocatError::NoPath { start: source, target }),
            }
        }
        edge_indices.reverse();

        let steps = edge_indices
            .iter()
            .map(|&idx| RouteStep { edge_id: self.edges[idx].id, cost: self.edges[idx].cost })
            .collect();

        Ok(RoutePath { steps, total_cost, geometry: self.multi_line(&edge_indices) })
    }

    /// Concatenate edge linestrings, in the order given, into a
    /// MultiLineString. Unknown edge ids are an error.
    pub fn edge_geometry(&self, ids: &[EdgeId]) -> Result<Geometry> {
        let mut parts = Vec::with_capacity(ids.len());
        for id in ids {
            let idx =
                self.by_id.get(id).copied().ok_or(GeocatError::EdgeNotFound { id: *id })?;
            if let Geometry::LineString { coordinates } = &self.edges[idx].geometry {
                parts.push(coordinates.clone());
            }
        }
        Ok(Geometry::MultiLineString { coordinates: parts })
    }

    fn multi_line(&self, edge_indices: &[usize]) -> Geometry {
        let parts = edge_indices
            .iter()
            .filter_map(|&idx| match &self.edges[idx].geometry {
                Geometry::LineString { coordinates } => Some(coordinates.clone()),
                // build() only admits LineString edge geometry
                _ => None,
            })
            .collect();
        Geometry::MultiLineString { coordinates: parts }
    }
}
