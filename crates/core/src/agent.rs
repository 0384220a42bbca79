//! Caller-facing conversation types.

use crate::trial::TrialView;
use serde::{Deserialize, Serialize};

/// The observable state of a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Opaque handle resuming the model-side conversation, when one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,

    /// Whether a conversation is in progress
    pub active: bool,
}

/// The result of one completed user turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnReply {
    /// The model's final text answer
    pub text: String,

    /// Trial summaries surfaced by search-type tools during this turn,
    /// concatenated in call order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trials: Vec<TrialView>,

    /// True when the tool-loop safety bound cut the turn short and the
    /// answer may be incomplete
    #[serde(default)]
    pub truncated: bool,
}
