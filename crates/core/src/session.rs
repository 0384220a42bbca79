//! Session state store — persists the continuation token outside process
//! memory so a restarted process can resume the same conversation.
//!
//! The store is a single durable key-value slot. `save` writes
//! unconditionally after every successfully completed turn; `restore` is
//! called once at agent creation; `clear` pairs with conversation reset.
//! Two concurrent conversations sharing one slot overwrite each other —
//! last writer wins, by contract.

use crate::error::SessionError;
use async_trait::async_trait;

/// A durable slot for the conversation continuation token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// A human-readable name for this store (e.g., "file").
    fn name(&self) -> &str;

    /// Persist the token, replacing any previous value.
    async fn save(&self, token: &str) -> Result<(), SessionError>;

    /// Read the persisted token, if any.
    async fn restore(&self) -> Result<Option<String>, SessionError>;

    /// Remove the slot.
    async fn clear(&self) -> Result<(), SessionError>;
}
