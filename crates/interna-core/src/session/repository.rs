//! Session repository trait.
//!
//! The durable slot the session is restored from at startup.

use super::model::PersistedSession;
use crate::error::Result;
use async_trait::async_trait;

/// Durable key-value slot holding the persisted session.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Reads the slot.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(PersistedSession))`: A session was stored
    /// - `Ok(None)`: The slot is empty
    /// - `Err(_)`: The slot could not be read
    async fn restore(&self) -> Result<Option<PersistedSession>>;

    /// Overwrites the slot.
    async fn persist(&self, session: &PersistedSession) -> Result<()>;

    /// Empties the slot. Succeeds if it was already empty.
    async fn clear(&self) -> Result<()>;
}
