//! Unified path management for Interna files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/interna/           # Config directory
//! ├── config.toml              # Client configuration
//! ├── session.toml             # Persisted session slot
//! └── logs/                    # Daily rolling logs
//!     └── interna.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "interna";

/// Errors that can occur during path resolution.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Platform config directory could not be determined.
    #[error("Cannot find config directory")]
    ConfigDirNotFound,
}

impl From<PathError> for interna_core::InternaError {
    fn from(err: PathError) -> Self {
        interna_core::InternaError::config(err.to_string())
    }
}

/// Resolves every file location the client uses.
///
/// By default paths live under the platform config directory (XDG on Linux).
/// Tests root them under a temporary directory with [`InternaPaths::with_base`].
#[derive(Debug, Clone, Default)]
pub struct InternaPaths {
    base: Option<PathBuf>,
}

impl InternaPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roots every path at `base` instead of the platform config directory.
    pub fn with_base(base: impl AsRef<Path>) -> Self {
        Self {
            base: Some(base.as_ref().to_path_buf()),
        }
    }

    /// Returns the Interna configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the session slot file.
    ///
    /// The slot holds a bearer credential; it is created with mode 600 on Unix.
    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session.toml"))
    }

    pub fn log_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}
