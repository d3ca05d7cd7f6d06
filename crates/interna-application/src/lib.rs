//! Application layer of the Interna client.
//!
//! Coordinators that sequence gateway calls, store mutations and session
//! persistence, plus the injected `ClientContext` that bundles them.

pub mod context;
pub mod entity_service;
pub mod logging;
pub mod session_service;

pub use context::{ClientContext, Gateways};
pub use entity_service::EntityService;
pub use session_service::{SessionScoped, SessionService};
