//! Configuration service implementation.
//!
//! Loads `ClientConfig` from `config.toml`, writing a default file on first
//! run, and caches the parsed value.

use crate::paths::InternaPaths;
use crate::storage::AtomicTomlFile;
use interna_core::config::ClientConfig;
use interna_core::error::Result;
use std::sync::{Arc, RwLock};

/// Environment variable overriding `api_base_url`.
pub const API_URL_ENV: &str = "INTERNA_API_URL";

/// Configuration service that loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    file: AtomicTomlFile<ClientConfig>,
    cached: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &InternaPaths) -> Result<Self> {
        Ok(Self {
            file: AtomicTomlFile::new(paths.config_file()?),
            cached: Arc::new(RwLock::new(None)),
        })
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be parsed, or if the default
    /// file cannot be written.
    pub fn get_config(&self) -> Result<ClientConfig> {
        if let Some(cached) = self.read_cache() {
            return Ok(cached);
        }

        let mut config = match self.file.load()? {
            Some(config) => config,
            None => {
                let config = ClientConfig::default();
                self.file.save(&config)?;
                tracing::info!(
                    "[ConfigService] Created default config at {:?}",
                    self.file.path()
                );
                config
            }
        };

        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            config.api_base_url = url;
        }

        if let Ok(mut write_lock) = self.cached.write() {
            *write_lock = Some(config.clone());
        }
        Ok(config)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.cached.write() {
            *write_lock = None;
        }
    }

    fn read_cache(&self) -> Option<ClientConfig> {
        self.cached.read().ok().and_then(|cached| cached.clone())
    }
}
