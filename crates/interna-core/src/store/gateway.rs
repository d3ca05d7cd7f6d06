//! Remote entity gateway trait.
//!
//! Defines the boundary each entity store's coordinator calls to fetch or
//! persist entities. Transport details (HTTP, JSON, retries) live behind
//! this trait.

use super::stats::Summary;
use super::traits::{Entity, EntityId};
use crate::error::Result;
use async_trait::async_trait;

/// Result of a full fetch: the batch plus an optional server-side summary.
#[derive(Debug, Clone)]
pub struct FetchResult<E: Entity> {
    pub entities: Vec<E>,
    pub summary: Option<Summary<E::Category>>,
}

impl<E: Entity> FetchResult<E> {
    pub fn new(entities: Vec<E>) -> Self {
        Self {
            entities,
            summary: None,
        }
    }

    pub fn with_summary(mut self, summary: Summary<E::Category>) -> Self {
        self.summary = Some(summary);
        self
    }
}

/// An abstract gateway for one entity kind.
///
/// # Implementation Notes
///
/// Implementations must:
/// - Map a rejected credential to `InternaError::Authorization`
/// - Map field-level validation failures to `InternaError::Validation`
/// - Map everything else that prevents a response to `InternaError::Transport`
///
/// The coordinators never retry automatically.
#[async_trait]
pub trait EntityGateway<E: Entity>: Send + Sync {
    /// Fetches the collection matching `filters`.
    async fn fetch_all(&self, filters: &E::Filters) -> Result<FetchResult<E>>;

    /// Fetches a single entity with its detail payload.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(E))`: Entity found
    /// - `Ok(None)`: Entity not found
    async fn fetch_one(&self, id: EntityId) -> Result<Option<E>>;

    /// Creates an entity and returns it with its server-assigned id.
    async fn create(&self, draft: &E::Draft) -> Result<E>;

    /// Persists a partial update and returns the stored entity.
    async fn persist_update(&self, id: EntityId, patch: &E::Patch) -> Result<E>;

    /// Deletes an entity.
    async fn remove(&self, id: EntityId) -> Result<()>;
}
