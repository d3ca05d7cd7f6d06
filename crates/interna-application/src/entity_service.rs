//! Entity coordinator.
//!
//! Each mutation goes to the gateway first and is applied to the store only
//! after the gateway succeeded, so a failed call leaves the store untouched.

use crate::session_service::{SessionScoped, SessionService};
use async_trait::async_trait;
use interna_core::entity::notification::{Notification, NotificationPatch};
use interna_core::error::Result;
use interna_core::store::{
    Entity, EntityGateway, EntityId, EntityStore, Mutation, StoreSnapshot, Summary,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to one entity kind's store and gateway. Clones share state.
pub struct EntityService<E: Entity> {
    store: Arc<RwLock<EntityStore<E>>>,
    gateway: Arc<dyn EntityGateway<E>>,
    session: SessionService,
}

impl<E: Entity> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            gateway: Arc::clone(&self.gateway),
            session: self.session.clone(),
        }
    }
}

impl<E: Entity> EntityService<E> {
    pub fn new(gateway: Arc<dyn EntityGateway<E>>, session: SessionService) -> Self {
        Self {
            store: Arc::new(RwLock::new(EntityStore::new())),
            gateway,
            session,
        }
    }

    /// Direct access to the store for views that render from it.
    pub fn store(&self) -> Arc<RwLock<EntityStore<E>>> {
        Arc::clone(&self.store)
    }

    pub async fn snapshot(&self) -> StoreSnapshot<E> {
        self.store.read().await.snapshot()
    }

    pub async fn summary(&self) -> Summary<E::Category> {
        self.store.read().await.summary().clone()
    }

    /// Reloads the collection using the current filters.
    pub async fn refresh(&self) -> Result<StoreSnapshot<E>> {
        let filters = self.store.read().await.filters().clone();
        let fetched = self.checked(self.gateway.fetch_all(&filters).await).await?;

        let mut store = self.store.write().await;
        store.load_all(fetched.entities, fetched.summary);
        Ok(store.snapshot())
    }

    /// Creates an entity through the gateway, then adds it to the store.
    ///
    /// # Errors
    ///
    /// Gateway errors are returned unchanged. An `InvariantViolation` means
    /// the returned id was already in the store.
    pub async fn create(&self, draft: &E::Draft) -> Result<E> {
        E::validate_draft(draft)?;
        let entity = self.checked(self.gateway.create(draft).await).await?;
        self.store.write().await.add(entity.clone())?;
        tracing::debug!("[{}Service] Created id {}", E::KIND, entity.id());
        Ok(entity)
    }

    /// Persists a partial update, then stores the entity the gateway
    /// returned, so server-side normalisation reaches the store.
    ///
    /// # Errors
    ///
    /// A patch failing client-side validation is rejected before any
    /// gateway call.
    pub async fn update(&self, id: EntityId, patch: &E::Patch) -> Result<Mutation> {
        E::validate_patch(patch)?;
        let saved = self
            .checked(self.gateway.persist_update(id, patch).await)
            .await?;
        Ok(self.store.write().await.replace(saved))
    }

    /// Deletes through the gateway, then removes from the store.
    pub async fn remove(&self, id: EntityId) -> Result<Mutation> {
        self.checked(self.gateway.remove(id).await).await?;
        Ok(self.store.write().await.delete(id))
    }

    /// Fetches the detail payload of `id` and makes it the selected entity.
    pub async fn open(&self, id: EntityId) -> Result<Option<E>> {
        let entity = self.checked(self.gateway.fetch_one(id).await).await?;
        let mut store = self.store.write().await;
        match &entity {
            Some(entity) => store.set_selected(entity.clone()),
            None => store.clear_selection(),
        }
        Ok(entity)
    }

    pub async fn select(&self, id: EntityId) -> Mutation {
        self.store.write().await.select(id)
    }

    pub async fn clear_selection(&self) {
        self.store.write().await.clear_selection();
    }

    pub async fn set_filters(&self, partial: E::Filters) {
        self.store.write().await.set_filters(partial);
    }

    pub async fn reset_filters(&self) {
        self.store.write().await.reset_filters();
    }

    /// Drops all data. Also done by the session on logout and expiry.
    pub async fn reset(&self) {
        self.store.clear().await;
    }

    /// Expires the session when the gateway rejected the credential.
    async fn checked<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result
            && self.session.intercept(e).await.is_none()
        {
            tracing::debug!("[{}Service] Gateway call failed: {}", E::KIND, e);
        }
        result
    }
}

#[async_trait]
impl<E: Entity> SessionScoped for RwLock<EntityStore<E>> {
    async fn clear(&self) {
        *self.write().await = EntityStore::new();
    }
}

impl EntityService<Notification> {
    /// Marks every unread notification in the store as read.
    ///
    /// Stops at the first gateway failure; notifications already marked
    /// stay marked.
    pub async fn mark_all_read(&self) -> Result<usize> {
        let unread: Vec<EntityId> = self
            .store
            .read()
            .await
            .items()
            .iter()
            .filter(|n| n.is_unread())
            .map(|n| n.id)
            .collect();

        let patch = NotificationPatch::mark_read();
        let mut marked = 0;
        for id in unread {
            if self.update(id, &patch).await?.is_applied() {
                marked += 1;
            }
        }
        Ok(marked)
    }
}
