//! Session domain model.

use crate::identity::{Credential, Identity, Role};
use serde::{Deserialize, Serialize};

/// Authenticated identity plus bearer credential.
///
/// `authenticated` is derived: both fields must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    identity: Option<Identity>,
    credential: Option<Credential>,
}

impl SessionState {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated_as(identity: Identity, credential: Credential) -> Self {
        Self {
            identity: Some(identity),
            credential: Some(credential),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some() && self.credential.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().map(|i| i.role)
    }

    pub(crate) fn identity_mut(&mut self) -> Option<&mut Identity> {
        self.identity.as_mut()
    }

    /// Projection written to the durable slot.
    pub fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            identity: self.identity.clone(),
            credential: self.credential.clone(),
            authenticated: self.is_authenticated(),
        }
    }
}

impl From<PersistedSession> for SessionState {
    /// Rebuilds the state from a stored slot. A half-populated slot (one of
    /// the two fields missing) restores as anonymous; the stored
    /// `authenticated` flag is never trusted on its own.
    fn from(persisted: PersistedSession) -> Self {
        match (persisted.identity, persisted.credential) {
            (Some(identity), Some(credential)) => Self::authenticated_as(identity, credential),
            _ => Self::anonymous(),
        }
    }
}

/// The durable session slot. Restricted to exactly these three fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,
    // Last so that TOML writers emit it as a trailing table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
}

/// What the access gate sees of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionView {
    /// Startup restore has not finished yet.
    Pending,
    Anonymous,
    Authenticated(Identity),
}

impl SessionView {
    pub fn role(&self) -> Option<Role> {
        match self {
            SessionView::Authenticated(identity) => Some(identity.role),
            _ => None,
        }
    }
}
