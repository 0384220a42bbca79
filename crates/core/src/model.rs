//! Model endpoint contract — the abstraction over the conversational LLM.
//!
//! A `ModelEndpoint` takes instructions, input (either raw user text or a
//! structured item list), and the advertised tool schemas, and returns a
//! response that is either a final message or a batch of tool-call requests.
//! The response `id` doubles as the continuation token: passing it as
//! `previous_response_id` on the next call resumes the model-side
//! conversation without resending history.

use crate::error::ModelError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A request to the model endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRequest {
    /// The model to use (e.g., "gpt-4o")
    pub model: String,

    /// System instructions — static behavioral prompt plus profile context.
    /// Sent on every call, including tool-output continuations.
    pub instructions: String,

    /// The input for this call
    pub input: ModelInput,

    /// Tool schemas the model may invoke. Advertised verbatim on every call.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSchema>,

    /// Continuation: the id of the response to resume from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<String>,
}

/// Input to a model call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelInput {
    /// Raw user text — used when a continuation token carries prior history
    Text(String),

    /// Structured items — the first turn of a conversation, or a batch of
    /// tool outputs continuing a tool round
    Items(Vec<InputItem>),
}

/// A structured input item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    /// A conversation message
    Message { role: String, content: String },

    /// Output of a tool call the model requested, keyed by its call id
    FunctionCallOutput { call_id: String, output: String },
}

impl InputItem {
    pub fn user(content: impl Into<String>) -> Self {
        InputItem::Message {
            role: "user".into(),
            content: content.into(),
        }
    }

    pub fn function_output(call_id: impl Into<String>, output: impl Into<String>) -> Self {
        InputItem::FunctionCallOutput {
            call_id: call_id.into(),
            output: output.into(),
        }
    }
}

/// A tool schema advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// A complete response from the model endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Response identifier — the continuation token for the next call
    pub id: String,

    /// Endpoint-reported status (e.g., "completed")
    #[serde(default)]
    pub status: String,

    /// Output items, in order
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

/// One item of model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    /// The model requests a tool execution
    FunctionCall(ToolCallRequest),

    /// A message composed of text segments
    Message { content: Vec<String> },
}

/// A model-issued request to execute a named tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Call id the output must be keyed by
    pub call_id: String,

    /// Tool name
    pub name: String,

    /// Arguments as a JSON string, exactly as the model produced them
    pub arguments: String,
}

impl ModelResponse {
    /// All tool-call requests in this response, in order.
    pub fn tool_calls(&self) -> Vec<&ToolCallRequest> {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::FunctionCall(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    /// Newline-joined concatenation of all text segments, in order.
    /// `None` when the response carries no text at all.
    pub fn text(&self) -> Option<String> {
        let segments: Vec<&str> = self
            .output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => Some(content),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect();

        if segments.is_empty() {
            None
        } else {
            Some(segments.join("\n"))
        }
    }
}

/// The core model endpoint trait.
///
/// The orchestrator calls `respond()` without knowing which backend is in
/// use; the production implementation lives in `trialscout-providers`, tests
/// use scripted mocks.
#[async_trait]
pub trait ModelEndpoint: Send + Sync {
    /// A human-readable name for this endpoint (e.g., "openai-responses").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn respond(&self, request: ModelRequest) -> std::result::Result<ModelResponse, ModelError>;
}
