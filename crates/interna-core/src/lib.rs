//! Domain layer of the Interna client.
//!
//! Holds the per-entity stores with their incrementally maintained
//! statistics, the session state machine, the role-based access gate, and
//! the boundary traits implemented by the infrastructure layer.

pub mod access;
pub mod config;
pub mod entity;
pub mod error;
pub mod identity;
pub mod session;
pub mod store;

// Re-export common error type
pub use error::{InternaError, Result};
