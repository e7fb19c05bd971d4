//! Error types for geocat

use thiserror::Error;

use crate::models::{EdgeId, FeatureId, NodeId};

#[derive(Debug, Error)]
pub enum GeocatError {
    // Geometry errors
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    #[error("CRS mismatch: input is EPSG:{actual}, engine expects EPSG:{expected}")]
    CrsMismatch { expected: u32, actual: u32 },

    // Catalogue errors
    #[error("Feature not found: {id}")]
    FeatureNotFound { id: FeatureId },

    // Routing errors
    #[error("Road edge not found: {id}")]
    EdgeNotFound { id: EdgeId },

    #[error("Invalid road graph: {reason}")]
    InvalidGraph { reason: String },

    #[error("No path from node {start} to node {target}")]
    NoPath { start: NodeId, target: NodeId },

    #[error("Routing graph not loaded. Load a road network first")]
    GraphNotReady,

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GeocatError {
    /// Shorthand for [`GeocatError::InvalidGeometry`].
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        GeocatError::InvalidGeometry { reason: reason.into() }
    }

    /// Shorthand for [`GeocatError::InvalidGraph`].
    pub fn invalid_graph(reason: impl Into<String>) -> Self {
        GeocatError::InvalidGraph { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, GeocatError>;
