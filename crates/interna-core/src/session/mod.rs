//! Session domain module.
//!
//! Single source of truth for who the caller is and whether they are
//! authenticated.
//!
//! # Module Structure
//!
//! - `model`: `SessionState`, the persisted slot projection and the gate-facing view
//! - `store`: the effect-free `SessionStore` state machine
//! - `repository`: durable slot trait used by the coordinator
//!
//! State transitions never touch storage. The application-layer
//! coordinator writes the slot after a transition commits.

mod model;
pub mod repository;
mod store;

// Re-export public API
pub use model::{PersistedSession, SessionState, SessionView};
pub use repository::SessionRepository;
pub use store::{RestoreStatus, SessionChange, SessionStore};
