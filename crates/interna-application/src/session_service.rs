//! Session coordinator.
//!
//! Sequences the external login exchange, the pure `SessionStore`
//! transitions and the durable slot writes. The store is mutated first; the
//! slot is written after the transition has committed.

use async_trait::async_trait;
use interna_core::access::{AccessDecision, LOGIN_PATH, RouteTable};
use interna_core::error::{InternaError, Result};
use interna_core::identity::{Authenticator, Credential, IdentityPatch, LoginRequest};
use interna_core::session::{PersistedSession, SessionChange, SessionRepository, SessionStore, SessionView};
use std::sync::{Arc, Mutex};
use tokio::sync::{RwLock, watch};

/// State that belongs to the signed-in user and must not outlive the
/// session.
#[async_trait]
pub trait SessionScoped: Send + Sync {
    /// Drops everything loaded on behalf of the previous user.
    async fn clear(&self);
}

/// Shared handle to the caller's session. Clones share state.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<RwLock<SessionStore>>,
    repository: Arc<dyn SessionRepository>,
    authenticator: Arc<dyn Authenticator>,
    routes: Arc<RouteTable>,
    /// Path an anonymous caller was turned away from, resumed after login.
    return_to: Arc<RwLock<Option<String>>>,
    changes: watch::Sender<SessionView>,
    /// Cleared whenever the session leaves the Authenticated state.
    scoped: Arc<Mutex<Vec<Arc<dyn SessionScoped>>>>,
}

impl SessionService {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        authenticator: Arc<dyn Authenticator>,
        routes: RouteTable,
    ) -> Self {
        let store = SessionStore::new();
        let (changes, _) = watch::channel(store.view());
        Self {
            store: Arc::new(RwLock::new(store)),
            repository,
            authenticator,
            routes: Arc::new(routes),
            return_to: Arc::new(RwLock::new(None)),
            changes,
            scoped: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Registers state to clear on logout and on credential expiry.
    pub fn register_scoped(&self, scoped: Arc<dyn SessionScoped>) {
        self.scoped
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(scoped);
    }

    /// Restores the session from the durable slot. Until this completes,
    /// the gate answers `Pending`.
    ///
    /// An unreadable slot is logged and treated as empty.
    pub async fn restore(&self) -> SessionView {
        let persisted = match self.repository.restore().await {
            Ok(persisted) => persisted,
            Err(e) => {
                tracing::error!("[SessionService] Failed to restore session: {}", e);
                None
            }
        };

        let view = {
            let mut store = self.store.write().await;
            store.finish_restore(persisted);
            store.view()
        };
        tracing::info!(
            "[SessionService] Restore complete, authenticated={}",
            matches!(view, SessionView::Authenticated(_))
        );
        self.publish(view.clone());
        view
    }

    /// Performs the login exchange and enters the Authenticated state.
    ///
    /// # Returns
    ///
    /// The path to navigate to: the remembered return path when the new
    /// role may see it, the role's landing view otherwise.
    ///
    /// # Errors
    ///
    /// Propagates the authenticator's error; the session is left unchanged.
    pub async fn login(&self, request: &LoginRequest) -> Result<String> {
        let (identity, credential) = self.authenticator.authenticate(request).await?;
        let role = identity.role;
        tracing::info!(
            "[SessionService] Login accepted for user {} ({})",
            identity.id,
            role
        );

        let (change, persisted, view) = {
            let mut store = self.store.write().await;
            let change = store.set_auth(identity, credential);
            (change, store.persisted(), store.view())
        };
        self.commit(change, persisted, view.clone()).await;

        let remembered = self.return_to.write().await.take();
        let target = remembered
            .filter(|path| self.routes.navigate(&view, path).is_allowed())
            .unwrap_or_else(|| role.landing_path().to_string());
        Ok(target)
    }

    /// Explicit logout. Idempotent.
    pub async fn logout(&self) {
        let (change, persisted, view) = {
            let mut store = self.store.write().await;
            let change = store.clear_auth();
            (change, store.persisted(), store.view())
        };
        if change.is_changed() {
            tracing::info!("[SessionService] Logged out");
        }
        self.commit(change, persisted, view).await;
    }

    /// Ends the session after the gateway rejected the credential.
    ///
    /// Returns the login path the caller must navigate to.
    pub async fn expire(&self) -> &'static str {
        tracing::warn!("[SessionService] Credential rejected by gateway, ending session");
        self.logout().await;
        LOGIN_PATH
    }

    /// Expires the session if `error` is an authorization failure.
    ///
    /// Returns the redirect target in that case.
    pub async fn intercept(&self, error: &InternaError) -> Option<&'static str> {
        if error.is_authorization() {
            Some(self.expire().await)
        } else {
            None
        }
    }

    /// Merges `patch` onto the current identity. No-op when anonymous.
    pub async fn update_identity(&self, patch: &IdentityPatch) {
        let (change, persisted, view) = {
            let mut store = self.store.write().await;
            let change = store.update_identity(patch);
            (change, store.persisted(), store.view())
        };
        self.commit(change, persisted, view).await;
    }

    /// Guards a navigation to `path`, remembering it when the caller must
    /// log in first.
    pub async fn guard(&self, path: &str) -> AccessDecision {
        let view = self.view().await;
        let decision = self.routes.navigate(&view, path);
        if let AccessDecision::DenyUnauthenticated { return_to } = &decision {
            *self.return_to.write().await = Some(return_to.clone());
        }
        decision
    }

    pub async fn view(&self) -> SessionView {
        self.store.read().await.view()
    }

    /// Bearer credential for gateway requests.
    pub async fn credential(&self) -> Option<Credential> {
        self.store.read().await.state().credential().cloned()
    }

    /// Receives a new view after every session change; re-run the gate on
    /// each.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.changes.subscribe()
    }

    /// Writes the slot after a committed transition.
    ///
    /// A failed write is logged but does not roll back the in-memory state:
    /// the slot only affects the next startup.
    async fn commit(&self, change: SessionChange, persisted: PersistedSession, view: SessionView) {
        if !change.is_changed() {
            return;
        }
        let written = if persisted.authenticated {
            self.repository.persist(&persisted).await
        } else {
            self.repository.clear().await
        };
        if let Err(e) = written {
            tracing::error!("[SessionService] Failed to write session slot: {}", e);
        }
        if view == SessionView::Anonymous {
            self.clear_scoped().await;
        }
        self.publish(view);
    }

    async fn clear_scoped(&self) {
        let scoped: Vec<_> = self
            .scoped
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        tracing::debug!("[SessionService] Clearing {} session-scoped stores", scoped.len());
        for state in scoped {
            state.clear().await;
        }
    }

    fn publish(&self, view: SessionView) {
        self.changes.send_replace(view);
    }
}
