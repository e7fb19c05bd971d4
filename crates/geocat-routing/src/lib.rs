//! Road-network routing for geocat
//!
//! A directed weighted graph built once from road edges, Dijkstra
//! shortest-path search with deterministic tie-breaking, and edge-geometry
//! reassembly for computed routes. The service wrapper swaps immutable
//! graph snapshots so reloads never tear in-flight queries.

pub mod graph;
pub mod service;

pub use graph::{GraphBuilder, RoadGraph};
pub use service::RoutingService;
