//! Routing service with atomically swapped graph snapshots.
//!
//! `RwLock::unwrap()` is intentional. Lock poisoning only occurs when
//! another thread panicked while holding the lock, which is an
//! unrecoverable state.

use std::sync::{Arc, RwLock};

use geocat_core::error::{GeocatError, Result};
use geocat_core::models::{EdgeId, Geometry, NodeId, RoutePath};

use crate::graph::RoadGraph;

/// Routing queries over the currently loaded graph.
///
/// The service starts unloaded; queries fail with `GraphNotReady` until a
/// graph is installed. `reload` swaps in a new immutable snapshot, so a
/// query that already took a snapshot completes against a consistent graph
/// version, old or new, never a mix.
#[derive(Default)]
pub struct RoutingService {
    graph: RwLock<Option<Arc<RoadGraph>>>,
}

impl RoutingService {
    /// Create an unloaded routing service
    pub fn new() -> Self {
        Self { graph: RwLock::new(None) }
    }

    /// Whether a graph has been loaded
    pub fn is_loaded(&self) -> bool {
        self.graph.read().unwrap().is_some()
    }

    /// Install a new graph snapshot, replacing any previous one
    pub fn reload(&self, graph: RoadGraph) {
        let snapshot = Arc::new(graph);
        tracing::info!(
            edges = snapshot.edge_count(),
            nodes = snapshot.node_count(),
            "loaded routing graph"
        );
        *self.graph.write().unwrap() = Some(snapshot);
    }

    /// The current graph snapshot
    pub fn snapshot(&self) -> Result<Arc<RoadGraph>> {
        self.graph.read().unwrap().clone().ok_or(GeocatError::GraphNotReady)
    }

    /// Shortest path over the current snapshot
    pub fn shortest_path(&self, source: NodeId, target: NodeId) -> Result<RoutePath> {
        self.snapshot()?.shortest_path(source, target)
    }

    /// Edge-geometry reassembly over the current snapshot
    pub fn edge_geometry(&self, ids: &[EdgeId]) -> Result<Geometry> {
        self.snapshot()?.edge_geometry(ids)
    }
}
