//! Role-based view access.
//!
//! # Module Structure
//!
//! - `gate`: the pure decision function `AccessGate::evaluate`
//! - `routes`: the static table of views and the roles allowed to see them

mod gate;
mod routes;

pub use gate::{AccessDecision, AccessGate, AllowedRoles, LOGIN_PATH, UNAUTHORIZED_PATH};
pub use routes::{RouteAccess, RouteTable, ViewRoute};
