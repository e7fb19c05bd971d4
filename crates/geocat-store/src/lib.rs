//! Feature store for geocat
//!
//! The catalogue port and its in-memory implementation. The store owns the
//! feature records and keeps the spatial index consistent with them as a
//! single logical unit; spatial queries narrow candidates through the index
//! before exact geometric confirmation.

pub mod memory;
pub mod ports;

pub use memory::MemoryFeatureStore;
pub use ports::FeatureStore;
