//! View route table.
//!
//! Every view declares statically which roles may see it. Lookups match the
//! longest declared prefix on a path-segment boundary, so
//! `/manager/tasks/42` is guarded by the `/manager/tasks` declaration.

use super::gate::{AccessDecision, AccessGate, AllowedRoles, LOGIN_PATH, UNAUTHORIZED_PATH};
use crate::identity::Role;
use crate::session::SessionView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// Reachable without a session (login, unauthorized).
    Public,
    Protected(AllowedRoles),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRoute {
    pub path: String,
    pub access: RouteAccess,
}

impl ViewRoute {
    pub fn public(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            access: RouteAccess::Public,
        }
    }

    pub fn protected(path: impl Into<String>, allowed: AllowedRoles) -> Self {
        Self {
            path: path.into(),
            access: RouteAccess::Protected(allowed),
        }
    }

    fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(self.path.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || self.path.ends_with('/'),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<ViewRoute>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, route: ViewRoute) -> Self {
        self.routes.push(route);
        self
    }

    /// The application's views.
    pub fn standard() -> Self {
        use Role::{Admin, Intern, Manager};

        let admin = || AllowedRoles::only([Admin]);
        let manager = || AllowedRoles::only([Manager]);
        let intern = || AllowedRoles::only([Intern]);
        let staff = || AllowedRoles::only([Admin, Manager]);

        Self::new()
            .with_route(ViewRoute::public(LOGIN_PATH))
            .with_route(ViewRoute::public(UNAUTHORIZED_PATH))
            // Admin
            .with_route(ViewRoute::protected("/admin", admin()))
            .with_route(ViewRoute::protected("/admin/dashboard", admin()))
            .with_route(ViewRoute::protected("/admin/users", admin()))
            .with_route(ViewRoute::protected("/admin/departments", admin()))
            // Manager
            .with_route(ViewRoute::protected("/manager", manager()))
            .with_route(ViewRoute::protected("/manager/dashboard", manager()))
            .with_route(ViewRoute::protected("/manager/interns", manager()))
            .with_route(ViewRoute::protected("/manager/tasks", manager()))
            .with_route(ViewRoute::protected("/manager/attendance", manager()))
            .with_route(ViewRoute::protected("/manager/evaluations", manager()))
            .with_route(ViewRoute::protected("/manager/reclamations", manager()))
            // Intern
            .with_route(ViewRoute::protected("/intern", intern()))
            .with_route(ViewRoute::protected("/intern/dashboard", intern()))
            .with_route(ViewRoute::protected("/intern/tasks", intern()))
            .with_route(ViewRoute::protected("/intern/attendance", intern()))
            .with_route(ViewRoute::protected("/intern/evaluations", intern()))
            .with_route(ViewRoute::protected("/intern/reclamations", intern()))
            // Shared
            .with_route(ViewRoute::protected("/reports", staff()))
            .with_route(ViewRoute::protected("/notifications", AllowedRoles::Any))
            .with_route(ViewRoute::protected("/profile", AllowedRoles::Any))
    }

    /// Access declared for `path`. Undeclared paths admit any authenticated
    /// role.
    pub fn access_for(&self, path: &str) -> RouteAccess {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        self.routes
            .iter()
            .filter(|route| route.matches(path))
            .max_by_key(|route| route.path.len())
            .map(|route| route.access.clone())
            .unwrap_or(RouteAccess::Protected(AllowedRoles::Any))
    }

    /// Guards a navigation to `path`.
    pub fn navigate(&self, session: &SessionView, path: &str) -> AccessDecision {
        match self.access_for(path) {
            RouteAccess::Public => AccessDecision::Allow,
            RouteAccess::Protected(allowed) => AccessGate::evaluate(session, &allowed, path),
        }
    }
}
