//! Session slot repositories.
//!
//! `FileSessionRepository` keeps the slot in a private TOML file so that a
//! restart restores the caller's session. `MemorySessionRepository` keeps it
//! in memory for tests and for clients that must not persist credentials.

use crate::paths::InternaPaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use interna_core::error::{InternaError, Result};
use interna_core::session::{PersistedSession, SessionRepository};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Session slot stored in `session.toml`.
#[derive(Debug, Clone)]
pub struct FileSessionRepository {
    file: AtomicTomlFile<PersistedSession>,
}

impl FileSessionRepository {
    /// Uses the default slot location from `paths`.
    pub fn new(paths: &InternaPaths) -> Result<Self> {
        Ok(Self::with_path(paths.session_file()?))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicTomlFile::new(path).private(),
        }
    }

    async fn blocking<F, T>(&self, op: F) -> Result<T>
    where
        F: FnOnce(AtomicTomlFile<PersistedSession>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || op(file))
            .await
            .map_err(|e| InternaError::internal(format!("Failed to join task: {}", e)))?
    }
}

#[async_trait]
impl SessionRepository for FileSessionRepository {
    /// A corrupted slot restores as empty: the client starts anonymous
    /// instead of refusing to start.
    async fn restore(&self) -> Result<Option<PersistedSession>> {
        self.blocking(|file| match file.load() {
            Ok(session) => Ok(session),
            Err(e) if e.is_parse() => {
                tracing::warn!(
                    "[FileSessionRepository] Unreadable session slot at {:?}, starting anonymous: {}",
                    file.path(),
                    e
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        })
        .await
    }

    async fn persist(&self, session: &PersistedSession) -> Result<()> {
        let session = session.clone();
        self.blocking(move |file| Ok(file.save(&session)?)).await
    }

    async fn clear(&self) -> Result<()> {
        self.blocking(|file| Ok(file.remove()?)).await
    }
}

/// In-memory session slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionRepository {
    slot: Arc<Mutex<Option<PersistedSession>>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `session` already stored, as if left by a previous run.
    pub fn with_session(session: PersistedSession) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(session))),
        }
    }

    /// Current slot contents.
    pub async fn stored(&self) -> Option<PersistedSession> {
        self.slot.lock().await.clone()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn restore(&self) -> Result<Option<PersistedSession>> {
        Ok(self.slot.lock().await.clone())
    }

    async fn persist(&self, session: &PersistedSession) -> Result<()> {
        *self.slot.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.lock().await = None;
        Ok(())
    }
}
