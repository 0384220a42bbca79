//! File-backed session slot — a single JSON document on disk.
//!
//! Storage location: `~/.trialscout/session.json`. The slot holds the
//! continuation token and the time it was saved; `restore` tolerates a
//! corrupted file by treating it as empty, since a lost token only means
//! starting a fresh conversation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};
use trialscout_core::error::SessionError;
use trialscout_core::session::SessionStore;

#[derive(Debug, Serialize, Deserialize)]
struct SessionSlot {
    continuation_token: String,
    saved_at: DateTime<Utc>,
}

/// A file-backed session store holding one conversation slot.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default path: `~/.trialscout/session.json`
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".trialscout").join("session.json")
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn save(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SessionError::Storage(format!("Failed to create session directory: {e}"))
            })?;
        }

        let slot = SessionSlot {
            continuation_token: token.to_string(),
            saved_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&slot)
            .map_err(|e| SessionError::Storage(format!("Failed to serialize session: {e}")))?;

        std::fs::write(&self.path, content)
            .map_err(|e| SessionError::Storage(format!("Failed to write session file: {e}")))?;

        debug!(path = %self.path.display(), "Session token saved");
        Ok(())
    }

    async fn restore(&self) -> Result<Option<String>, SessionError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            // No file yet: no conversation to resume
            Err(_) => return Ok(None),
        };

        match serde_json::from_str::<SessionSlot>(&content) {
            Ok(slot) => Ok(Some(slot.continuation_token)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Session file corrupted, starting fresh");
                Ok(None)
            }
        }
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Storage(format!(
                "Failed to remove session file: {e}"
            ))),
        }
    }
}
