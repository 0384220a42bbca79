//! # TrialScout Core
//!
//! Domain types, traits, and error definitions for the TrialScout
//! clinical-trial search agent. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem boundary is defined as a trait here. Implementations live
//! in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod agent;
pub mod cache;
pub mod error;
pub mod model;
pub mod profile;
pub mod session;
pub mod source;
pub mod tool;
pub mod trial;

// Re-export key types at crate root for ergonomics
pub use agent::{ConversationState, TurnReply};
pub use cache::{CacheEntry, TrialCache};
pub use error::{Error, ModelError, RegistryError, Result, SessionError, SourceError, ToolError};
pub use model::{
    InputItem, ModelEndpoint, ModelInput, ModelRequest, ModelResponse, OutputItem, ToolCallRequest,
    ToolSchema,
};
pub use profile::PatientProfile;
pub use session::SessionStore;
pub use source::{CancerType, Registry, RegistryStudy, SearchPage, TrialSource};
pub use tool::{ToolHandler, ToolOutput, ToolRegistry, ToolReply};
pub use trial::{ClosestSite, FullTrial, SlimTrial, TrialRecord, TrialSite, TrialView};
