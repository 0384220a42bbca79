//! In-memory session slot — for testing and ephemeral sessions.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use trialscout_core::error::SessionError;
use trialscout_core::session::SessionStore;

/// A session store holding the token in process memory only.
pub struct InMemorySessionStore {
    token: Arc<RwLock<Option<String>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            token: Arc::new(RwLock::new(None)),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn save(&self, token: &str) -> Result<(), SessionError> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn restore(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.read().await.clone())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.token.write().await = None;
        Ok(())
    }
}
