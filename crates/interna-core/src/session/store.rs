//! Session state machine.
//!
//! ```text
//! Anonymous --set_auth--> Authenticated --clear_auth--> Anonymous
//! ```
//!
//! The store performs no I/O. Each transition reports whether the persisted
//! projection changed so the caller knows whether to write the slot.

use super::model::{PersistedSession, SessionState, SessionView};
use crate::identity::{Credential, Identity, IdentityPatch};

/// Whether startup restore from the durable slot has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreStatus {
    Pending,
    Restored,
}

/// Result of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    Changed,
    Unchanged,
}

impl SessionChange {
    pub fn is_changed(&self) -> bool {
        matches!(self, SessionChange::Changed)
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    state: SessionState,
    restore: RestoreStatus,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Creates an empty store awaiting startup restore.
    pub fn new() -> Self {
        Self {
            state: SessionState::anonymous(),
            restore: RestoreStatus::Pending,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn restore_status(&self) -> RestoreStatus {
        self.restore
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn view(&self) -> SessionView {
        match (self.restore, self.state.identity()) {
            (RestoreStatus::Pending, _) => SessionView::Pending,
            (RestoreStatus::Restored, Some(identity)) if self.state.is_authenticated() => {
                SessionView::Authenticated(identity.clone())
            }
            (RestoreStatus::Restored, _) => SessionView::Anonymous,
        }
    }

    pub fn persisted(&self) -> PersistedSession {
        self.state.to_persisted()
    }

    /// Completes startup restore. `None` means the slot was empty.
    ///
    /// Ignored once restore has completed, so a late restore cannot
    /// overwrite a login that happened in the meantime.
    pub fn finish_restore(&mut self, persisted: Option<PersistedSession>) {
        if self.restore == RestoreStatus::Restored {
            tracing::debug!("[SessionStore] restore already completed, ignoring");
            return;
        }
        self.state = persisted.map(SessionState::from).unwrap_or_default();
        self.restore = RestoreStatus::Restored;
    }

    /// Enters the Authenticated state. Always succeeds.
    pub fn set_auth(&mut self, identity: Identity, credential: Credential) -> SessionChange {
        let next = SessionState::authenticated_as(identity, credential);
        self.restore = RestoreStatus::Restored;
        if next == self.state {
            return SessionChange::Unchanged;
        }
        self.state = next;
        SessionChange::Changed
    }

    /// Returns to the Anonymous state. Idempotent.
    pub fn clear_auth(&mut self) -> SessionChange {
        self.restore = RestoreStatus::Restored;
        if self.state == SessionState::anonymous() {
            return SessionChange::Unchanged;
        }
        self.state = SessionState::anonymous();
        SessionChange::Changed
    }

    /// Merges `patch` onto the current identity. No-op when anonymous.
    pub fn update_identity(&mut self, patch: &IdentityPatch) -> SessionChange {
        let Some(identity) = self.state.identity_mut() else {
            return SessionChange::Unchanged;
        };
        let before = identity.clone();
        identity.apply(patch);
        if *identity == before {
            SessionChange::Unchanged
        } else {
            SessionChange::Changed
        }
    }
}
