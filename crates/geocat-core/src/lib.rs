//! Geocat core - domain models, error taxonomy, and configuration
//!
//! This crate contains the domain types shared by the geocat engine crates:
//! the feature catalogue records, the GeoJSON-compatible geometry model,
//! the road-network records, and the layered engine configuration.

pub mod config;
pub mod error;
pub mod models;

pub use error::{GeocatError, Result};
