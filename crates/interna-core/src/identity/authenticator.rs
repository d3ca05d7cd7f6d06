//! Authentication service trait.
//!
//! The credential exchange itself is performed by an external service; the
//! client only consumes its result.

use super::model::{Credential, Identity};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Login form payload.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// External login exchange.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Exchanges login credentials for an identity and a bearer credential.
    ///
    /// # Returns
    ///
    /// - `Ok((Identity, Credential))`: Login accepted
    /// - `Err(InternaError::Authorization)`: Credentials rejected
    /// - `Err(InternaError::Transport)`: Service unreachable
    async fn authenticate(&self, request: &LoginRequest) -> Result<(Identity, Credential)>;
}
