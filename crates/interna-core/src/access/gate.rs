//! Access gate.

use crate::identity::Role;
use crate::session::SessionView;
use serde::Serialize;

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Roles a protected view admits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AllowedRoles {
    /// Any authenticated role.
    #[default]
    Any,
    Only(Vec<Role>),
}

impl AllowedRoles {
    pub fn only(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::Only(roles.into_iter().collect())
    }

    pub fn permits(&self, role: Role) -> bool {
        match self {
            AllowedRoles::Any => true,
            AllowedRoles::Only(roles) => roles.contains(&role),
        }
    }
}

/// Outcome of guarding one navigation. Exactly one per evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Session restore still running: show a placeholder, do not redirect.
    Pending,
    /// No session: go to the login view and come back to `return_to` after.
    DenyUnauthenticated { return_to: String },
    /// Authenticated with a role the view does not admit.
    DenyUnauthorized { redirect_to: String },
    Allow,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    /// Path the router should navigate to instead of rendering, if any.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            AccessDecision::DenyUnauthenticated { .. } => Some(LOGIN_PATH),
            AccessDecision::DenyUnauthorized { redirect_to } => Some(redirect_to),
            AccessDecision::Pending | AccessDecision::Allow => None,
        }
    }
}

/// The authorization decision function guarding views by role.
pub struct AccessGate;

impl AccessGate {
    /// Decides whether the view at `requested_path`, admitting `allowed`,
    /// may render for `session`.
    ///
    /// Pure: re-evaluate on every navigation and on every session change.
    pub fn evaluate(
        session: &SessionView,
        allowed: &AllowedRoles,
        requested_path: &str,
    ) -> AccessDecision {
        match session {
            SessionView::Pending => AccessDecision::Pending,
            SessionView::Anonymous => AccessDecision::DenyUnauthenticated {
                return_to: requested_path.to_string(),
            },
            SessionView::Authenticated(identity) if allowed.permits(identity.role) => {
                AccessDecision::Allow
            }
            SessionView::Authenticated(identity) => {
                tracing::debug!(
                    "[AccessGate] role {} denied at {}",
                    identity.role,
                    requested_path
                );
                AccessDecision::DenyUnauthorized {
                    redirect_to: UNAUTHORIZED_PATH.to_string(),
                }
            }
        }
    }
}
