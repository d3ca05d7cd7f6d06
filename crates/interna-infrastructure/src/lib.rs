//! Infrastructure layer of the Interna client.
//!
//! Implements the boundary traits declared in `interna-core`: the durable
//! session slot, configuration loading and an in-memory entity gateway.

pub mod config_service;
pub mod gateway;
pub mod paths;
pub mod session_repository;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::gateway::MemoryGateway;
pub use crate::paths::InternaPaths;
pub use crate::session_repository::{FileSessionRepository, MemorySessionRepository};
