//! In-memory entity gateway.

use super::records::{DraftContext, ServerRecord};
use async_trait::async_trait;
use chrono::Utc;
use interna_core::error::{InternaError, Result};
use interna_core::identity::UserId;
use interna_core::store::{EntityGateway, EntityId, FetchResult, Summary};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

struct Inner<E> {
    /// Newest first, like the API's default ordering.
    records: Vec<E>,
    next_id: EntityId,
    /// Errors returned, in order, by the next calls.
    failures: VecDeque<InternaError>,
    supply_summary: bool,
}

/// Gateway serving one entity kind from memory.
///
/// Clones share the same record list.
pub struct MemoryGateway<E> {
    inner: Arc<Mutex<Inner<E>>>,
    actor: UserId,
}

impl<E> Clone for MemoryGateway<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            actor: self.actor,
        }
    }
}

impl<E: ServerRecord> MemoryGateway<E> {
    /// Creates an empty gateway acting on behalf of user `actor`.
    pub fn new(actor: UserId) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                records: Vec::new(),
                next_id: 1,
                failures: VecDeque::new(),
                supply_summary: false,
            })),
            actor,
        }
    }

    /// Replaces the stored records. New ids continue after the largest one.
    pub async fn seed(&self, records: Vec<E>) {
        let mut inner = self.inner.lock().await;
        inner.next_id = records.iter().map(|r| r.id()).max().unwrap_or(0) + 1;
        inner.records = records;
    }

    /// Makes the next call fail with `error`.
    pub async fn fail_next(&self, error: InternaError) {
        self.inner.lock().await.failures.push_back(error);
    }

    /// Whether `fetch_all` also returns a server-computed summary.
    pub async fn set_supply_summary(&self, supply: bool) {
        self.inner.lock().await.supply_summary = supply;
    }

    pub async fn records(&self) -> Vec<E> {
        self.inner.lock().await.records.clone()
    }

    fn take_failure(inner: &mut Inner<E>) -> Result<()> {
        match inner.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<E: ServerRecord> EntityGateway<E> for MemoryGateway<E> {
    async fn fetch_all(&self, filters: &E::Filters) -> Result<FetchResult<E>> {
        let mut inner = self.inner.lock().await;
        Self::take_failure(&mut inner)?;

        let entities: Vec<E> = inner
            .records
            .iter()
            .filter(|r| r.matches(filters))
            .cloned()
            .collect();
        let result = if inner.supply_summary {
            let summary = Summary::from_entities(&entities);
            FetchResult::new(entities).with_summary(summary)
        } else {
            FetchResult::new(entities)
        };
        Ok(result)
    }

    async fn fetch_one(&self, id: EntityId) -> Result<Option<E>> {
        let mut inner = self.inner.lock().await;
        Self::take_failure(&mut inner)?;
        Ok(inner.records.iter().find(|r| r.id() == id).cloned())
    }

    async fn create(&self, draft: &E::Draft) -> Result<E> {
        let mut inner = self.inner.lock().await;
        Self::take_failure(&mut inner)?;

        let ctx = DraftContext {
            id: inner.next_id,
            actor: self.actor,
            now: Utc::now(),
        };
        inner.next_id += 1;
        let record = E::from_draft(draft, &ctx);
        inner.records.insert(0, record.clone());
        Ok(record)
    }

    async fn persist_update(&self, id: EntityId, patch: &E::Patch) -> Result<E> {
        let mut inner = self.inner.lock().await;
        Self::take_failure(&mut inner)?;

        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| InternaError::not_found(E::KIND, id))?;
        *record = record.apply_patch(patch);
        Ok(record.clone())
    }

    async fn remove(&self, id: EntityId) -> Result<()> {
        let mut inner = self.inner.lock().await;
        Self::take_failure(&mut inner)?;

        let index = inner
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| InternaError::not_found(E::KIND, id))?;
        inner.records.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interna_core::entity::reclamation::{
        Reclamation, ReclamationDraft, ReclamationFilters, ReclamationPatch, ReclamationStatus,
    };

    fn draft(subject: &str) -> ReclamationDraft {
        ReclamationDraft {
            subject: subject.to_string(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let gateway = MemoryGateway::<Reclamation>::new(4);
        let first = gateway.create(&draft("Laptop")).await.unwrap();
        let second = gateway.create(&draft("Parking")).await.unwrap();

        assert_eq!(first.id + 1, second.id);
        assert_eq!(first.intern_id, 4);
        let ids: Vec<_> = gateway.records().await.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_fetch_filters_and_summary() {
        let gateway = MemoryGateway::<Reclamation>::new(4);
        let a = gateway.create(&draft("Laptop")).await.unwrap();
        gateway.create(&draft("Parking")).await.unwrap();
        gateway
            .persist_update(
                a.id,
                &ReclamationPatch::respond(ReclamationStatus::Resolved, "Replaced"),
            )
            .await
            .unwrap();
        gateway.set_supply_summary(true).await;

        let result = gateway
            .fetch_all(&ReclamationFilters {
                status: Some(ReclamationStatus::Resolved),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(result.entities.len(), 1);
        let summary = result.summary.unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.count(ReclamationStatus::Resolved), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_applies_once() {
        let gateway = MemoryGateway::<Reclamation>::new(4);
        gateway
            .fail_next(InternaError::transport("connection reset"))
            .await;

        let err = gateway.create(&draft("Laptop")).await.unwrap_err();
        assert!(err.is_transport());
        assert!(gateway.records().await.is_empty());
        assert!(gateway.create(&draft("Laptop")).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let gateway = MemoryGateway::<Reclamation>::new(4);
        assert!(gateway.remove(3).await.unwrap_err().is_not_found());
        assert!(
            gateway
                .persist_update(3, &ReclamationPatch::default())
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(gateway.fetch_one(3).await.unwrap().is_none());
    }
}
