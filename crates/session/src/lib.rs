//! Session state stores for TrialScout.
//!
//! Two implementations of [`SessionStore`]: a durable file-backed slot for
//! the CLI, and an in-memory slot for tests and embedded use.

mod file;
mod in_memory;

pub use file::FileSessionStore;
pub use in_memory::InMemorySessionStore;
