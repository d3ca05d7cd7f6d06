//! Contracts implemented by every entity kind.

use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::hash::Hash;
use strum::IntoEnumIterator;

/// Stable integer identifier assigned by the remote API.
pub type EntityId = i64;

/// A closed status/category enumeration used to bucket entities.
///
/// Every variant is enumerable so that a summary can report zero counts
/// for categories with no members.
pub trait Category:
    Copy + Ord + Hash + Debug + Send + Sync + IntoEnumIterator + Serialize + DeserializeOwned + 'static
{
}

impl<T> Category for T where
    T: Copy
        + Ord
        + Hash
        + Debug
        + Send
        + Sync
        + IntoEnumIterator
        + Serialize
        + DeserializeOwned
        + 'static
{
}

/// Filter criteria a view sends along with a fetch request.
///
/// Filters are plain bookkeeping: the store never filters its own
/// collection with them.
pub trait Filters: Clone + Default + Debug + PartialEq + Send + Sync {
    /// Overlays the fields present in `partial`. Last write wins.
    fn merge(&mut self, partial: Self);
}

/// An immutable value snapshot of one business object.
///
/// Mutations never edit an entity in place: `apply_patch` produces the
/// replacement value.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// Human-readable kind name used in logs and errors.
    const KIND: &'static str;

    type Category: Category;
    /// Partial update payload, merged over an existing entity.
    type Patch: Clone + Debug + Send + Sync;
    /// Creation payload sent to the gateway (no id yet).
    type Draft: Clone + Debug + Send + Sync;
    type Filters: Filters;

    fn id(&self) -> EntityId;

    fn category(&self) -> Self::Category;

    /// The value this entity contributes to the kind's averaged metric,
    /// or `None` if the kind has no averaged metric.
    fn metric(&self) -> Option<f64> {
        None
    }

    /// Returns a copy of `self` with `patch` merged over it. The id is never
    /// changed by a patch.
    fn apply_patch(&self, patch: &Self::Patch) -> Self;

    /// Client-side checks run before a draft is sent to the gateway.
    fn validate_draft(_draft: &Self::Draft) -> Result<()> {
        Ok(())
    }

    /// Client-side checks run before a patch is sent to the gateway.
    fn validate_patch(_patch: &Self::Patch) -> Result<()> {
        Ok(())
    }
}
