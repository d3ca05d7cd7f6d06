//! Generic entity store.

use super::stats::Summary;
use super::traits::{Entity, EntityId, Filters};
use crate::error::{InternaError, Result};

/// Outcome of an `update`/`delete`/`select` on an id.
///
/// A missing id is a benign race (the entity was already removed elsewhere),
/// not an error: the store is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    Missing,
}

impl Mutation {
    pub fn is_applied(&self) -> bool {
        matches!(self, Mutation::Applied)
    }
}

/// Owned copy of a store's observable state, handed to views.
#[derive(Debug, Clone)]
pub struct StoreSnapshot<E: Entity> {
    pub items: Vec<E>,
    pub summary: Summary<E::Category>,
    pub selected: Option<E>,
    pub filters: E::Filters,
}

/// Holds one ordered collection of entities plus its statistics summary.
///
/// Every mutation moves the collection and the summary together; no method
/// leaves them out of step. The summary is maintained incrementally, never
/// by rescanning the collection (except on `load_all`).
#[derive(Debug, Clone)]
pub struct EntityStore<E: Entity> {
    /// Newest first.
    items: Vec<E>,
    summary: Summary<E::Category>,
    /// Entity currently open in a detail view. May be a richer copy than the
    /// one in `items`.
    selected: Option<E>,
    filters: E::Filters,
}

impl<E: Entity> Default for EntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EntityStore<E> {
    /// Creates an empty store with a zero summary and default filters.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            summary: Summary::zero(),
            selected: None,
            filters: E::Filters::default(),
        }
    }

    // ============================================================================
    // Read access
    // ============================================================================

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn summary(&self) -> &Summary<E::Category> {
        &self.summary
    }

    pub fn selected(&self) -> Option<&E> {
        self.selected.as_ref()
    }

    pub fn filters(&self) -> &E::Filters {
        &self.filters
    }

    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn snapshot(&self) -> StoreSnapshot<E> {
        StoreSnapshot {
            items: self.items.clone(),
            summary: self.summary.clone(),
            selected: self.selected.clone(),
            filters: self.filters.clone(),
        }
    }

    /// Summary recomputed from scratch over the current collection.
    pub fn recompute_summary(&self) -> Summary<E::Category> {
        Summary::from_entities(&self.items)
    }

    // ============================================================================
    // Mutations
    // ============================================================================

    /// Replaces the collection wholesale.
    ///
    /// A supplied summary is checked against a scan of `entities` and
    /// replaced by the scan if they disagree. Repeated ids keep their first
    /// occurrence. The selected entity is re-resolved against the new
    /// collection and cleared if it is no longer present.
    pub fn load_all(&mut self, entities: Vec<E>, summary: Option<Summary<E::Category>>) {
        let mut items: Vec<E> = Vec::with_capacity(entities.len());
        for entity in entities {
            if items.iter().any(|e| e.id() == entity.id()) {
                tracing::warn!(
                    "[{}Store] load_all: dropping repeated id {}",
                    E::KIND,
                    entity.id()
                );
                continue;
            }
            items.push(entity);
        }

        let computed = Summary::from_entities(&items);
        self.summary = match summary {
            Some(supplied) if supplied.consistent_with(&computed) => supplied,
            Some(_) => {
                tracing::warn!(
                    "[{}Store] load_all: supplied summary disagrees with collection, using recomputed one",
                    E::KIND
                );
                computed
            }
            None => computed,
        };

        self.selected = self
            .selected
            .take()
            .and_then(|selected| items.iter().find(|e| e.id() == selected.id()).cloned());
        self.items = items;

        tracing::debug!(
            "[{}Store] load_all: {} entities",
            E::KIND,
            self.items.len()
        );
    }

    /// Inserts `entity` at the head of the collection.
    ///
    /// # Errors
    ///
    /// Returns `InternaError::InvariantViolation` if an entity with the same
    /// id is already present. The store is left unchanged in that case.
    /// This holds in debug builds too: the violation is logged at error
    /// level and returned, never turned into a panic.
    pub fn add(&mut self, entity: E) -> Result<()> {
        if self.contains(entity.id()) {
            tracing::error!(
                "[{}Store] add: duplicate id {} (store out of sync with gateway)",
                E::KIND,
                entity.id()
            );
            return Err(InternaError::invariant(format!(
                "{} with id {} already exists",
                E::KIND,
                entity.id()
            )));
        }

        self.summary
            .record_insert(entity.category(), entity.metric());
        self.items.insert(0, entity);
        Ok(())
    }

    /// Replaces the entity at `id` with `patch` merged over it.
    ///
    /// The selected entity receives the same patch when its id matches.
    pub fn update(&mut self, id: EntityId, patch: &E::Patch) -> Mutation {
        let Some(index) = self.position(id) else {
            tracing::debug!("[{}Store] update: id {} not present, ignoring", E::KIND, id);
            return Mutation::Missing;
        };

        let new = self.items[index].apply_patch(patch);
        self.swap_at(index, new);

        if let Some(selected) = self.selected.as_mut()
            && selected.id() == id
        {
            *selected = selected.apply_patch(patch);
        }

        Mutation::Applied
    }

    /// Replaces the entity with the same id by `entity`, e.g. the value the
    /// gateway returned after persisting an update.
    ///
    /// The selected entity is replaced too when its id matches.
    pub fn replace(&mut self, entity: E) -> Mutation {
        let id = entity.id();
        let Some(index) = self.position(id) else {
            tracing::debug!("[{}Store] replace: id {} not present, ignoring", E::KIND, id);
            return Mutation::Missing;
        };

        if self.selected.as_ref().is_some_and(|s| s.id() == id) {
            self.selected = Some(entity.clone());
        }
        self.swap_at(index, entity);

        Mutation::Applied
    }

    /// Removes the entity at `id`. Clears the selection if it pointed there.
    pub fn delete(&mut self, id: EntityId) -> Mutation {
        let Some(index) = self.position(id) else {
            tracing::debug!("[{}Store] delete: id {} not present, ignoring", E::KIND, id);
            return Mutation::Missing;
        };

        let removed = self.items.remove(index);
        self.summary
            .record_remove(removed.category(), removed.metric());

        if self.selected.as_ref().is_some_and(|s| s.id() == id) {
            self.selected = None;
        }

        Mutation::Applied
    }

    // ============================================================================
    // Selection and filters
    // ============================================================================

    /// Selects the collection entity at `id` as the detail entity.
    pub fn select(&mut self, id: EntityId) -> Mutation {
        match self.get(id).cloned() {
            Some(entity) => {
                self.selected = Some(entity);
                Mutation::Applied
            }
            None => Mutation::Missing,
        }
    }

    /// Sets a detail entity fetched separately from the collection.
    pub fn set_selected(&mut self, entity: E) {
        self.selected = Some(entity);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn set_filters(&mut self, partial: E::Filters) {
        self.filters.merge(partial);
    }

    pub fn reset_filters(&mut self) {
        self.filters = E::Filters::default();
    }

    fn swap_at(&mut self, index: usize, new: E) {
        let old = &self.items[index];
        self.summary.record_replace(
            (old.category(), old.metric()),
            (new.category(), new.metric()),
        );
        self.items[index] = new;
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.items.iter().position(|e| e.id() == id)
    }
}
