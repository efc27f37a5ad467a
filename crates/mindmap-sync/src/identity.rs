//! Caller identity establishment.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};

/// Yields a stable caller identity string. Required before any store access.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn establish_identity(&self) -> SyncResult<String>;
}

/// Anonymous sign-in: a random id, stable for the lifetime of the provider.
#[derive(Debug, Clone)]
pub struct AnonymousIdentity {
    caller_id: String,
}

impl AnonymousIdentity {
    pub fn new() -> Self {
        Self {
            caller_id: Uuid::new_v4().to_string(),
        }
    }
}

impl Default for AnonymousIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for AnonymousIdentity {
    async fn establish_identity(&self) -> SyncResult<String> {
        debug!(caller_id = %self.caller_id, "anonymous_identity");
        Ok(self.caller_id.clone())
    }
}

/// Sign-in with a pre-issued token; the token itself is the caller id.
#[derive(Debug, Clone)]
pub struct TokenIdentity {
    token: String,
}

impl TokenIdentity {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for TokenIdentity {
    async fn establish_identity(&self) -> SyncResult<String> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(SyncError::identity("sign-in token is empty"));
        }
        debug!("token_identity");
        Ok(token.to_string())
    }
}

/// Token sign-in when a token is configured, anonymous otherwise.
pub fn identity_from_config(config: &SyncConfig) -> Arc<dyn IdentityProvider> {
    match &config.auth_token {
        Some(token) => Arc::new(TokenIdentity::new(token.clone())),
        None => Arc::new(AnonymousIdentity::new()),
    }
}
