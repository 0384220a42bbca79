//! Model endpoint implementations for TrialScout.
//!
//! One production backend: the OpenAI Responses API, whose response ids
//! serve as the conversation continuation token.

mod responses;

pub use responses::ResponsesEndpoint;
