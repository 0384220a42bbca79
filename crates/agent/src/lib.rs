//! Conversation orchestrator for TrialScout.
//!
//! Drives the turn loop against a [`ModelEndpoint`]: send the user's
//! message, execute any tool calls the model issues, feed the outputs back,
//! and repeat until the model produces a final text answer. The continuation
//! token persists through a [`SessionStore`] so a restarted process resumes
//! the same model-side conversation.
//!
//! [`ModelEndpoint`]: trialscout_core::model::ModelEndpoint
//! [`SessionStore`]: trialscout_core::session::SessionStore

mod instructions;
mod orchestrator;

pub use instructions::build_instructions;
pub use orchestrator::TrialAgent;
