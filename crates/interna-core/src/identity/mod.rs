//! Identity domain module.
//!
//! This module contains the authenticated caller's identity, its role and
//! the opaque bearer credential handed out by the authentication service.
//!
//! # Module Structure
//!
//! - `model`: `Identity`, `Role`, `Credential` and the partial `IdentityPatch`
//! - `authenticator`: the external login exchange boundary
//!
//! # Usage
//!
//! ```ignore
//! use interna_core::identity::{Identity, Role, Credential, Authenticator};
//! ```

mod authenticator;
mod model;

// Re-export public API
pub use authenticator::{Authenticator, LoginRequest};
pub use model::{Credential, DepartmentId, Identity, IdentityPatch, Role, UserId};
