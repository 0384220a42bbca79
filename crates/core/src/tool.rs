//! Tool handler trait and the tool registry — the Tool Executor.
//!
//! Each data operation (search, detail lookup, eligibility lookup, ...)
//! implements `ToolHandler`. Handlers are registered in a `ToolRegistry`
//! keyed by operation name, validated at startup against the advertised
//! schema list so a misspelled registration fails fast instead of surfacing
//! as a mystery "unknown tool" at runtime.
//!
//! Dispatch never raises past the orchestrator boundary: a handler error —
//! bad arguments, upstream failure, unknown name — is converted into an
//! `{"error": ...}` payload so the model receives closure for every call it
//! issued and one failing tool does not abort the turn.

use crate::error::ToolError;
use crate::model::{ToolCallRequest, ToolSchema};
use crate::trial::TrialView;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Successful output of one tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// The payload fed back to the model
    pub value: serde_json::Value,

    /// Trial summaries this tool surfaced, collected by the orchestrator
    /// into the caller-facing reply
    pub trials: Vec<TrialView>,
}

impl ToolOutput {
    pub fn value(value: serde_json::Value) -> Self {
        Self {
            value,
            trials: Vec::new(),
        }
    }

    pub fn with_trials(value: serde_json::Value, trials: Vec<TrialView>) -> Self {
        Self { value, trials }
    }
}

/// The completed result of one tool call, keyed by the model's call id.
#[derive(Debug, Clone)]
pub struct ToolReply {
    pub call_id: String,
    pub output: serde_json::Value,
    pub trials: Vec<TrialView>,
}

/// One named, schema-declared operation the model may invoke.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The operation name (e.g., "search_trials").
    fn name(&self) -> &str;

    /// Description sent to the model.
    fn description(&self) -> &str;

    /// JSON Schema describing the operation's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute with parsed arguments.
    async fn execute(&self, args: serde_json::Value) -> Result<ToolOutput, ToolError>;

    /// The schema advertised to the model for this operation.
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of tool handlers keyed by operation name.
pub struct ToolRegistry {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler. Replaces any existing handler with the same name.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        self.handlers.insert(handler.name().to_string(), handler);
    }

    /// All schemas to advertise to the model.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> =
            self.handlers.values().map(|h| h.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Check the registered handlers against an advertised schema list.
    ///
    /// Fails when a schema has no handler or a handler has no schema, so a
    /// misregistration is caught at startup rather than mid-conversation.
    pub fn validate_against(&self, advertised: &[ToolSchema]) -> Result<(), ToolError> {
        for schema in advertised {
            if !self.handlers.contains_key(&schema.name) {
                return Err(ToolError::SchemaMismatch(format!(
                    "advertised tool '{}' has no registered handler",
                    schema.name
                )));
            }
        }
        for name in self.handlers.keys() {
            if !advertised.iter().any(|s| &s.name == name) {
                return Err(ToolError::SchemaMismatch(format!(
                    "registered handler '{name}' is not advertised"
                )));
            }
        }
        Ok(())
    }

    /// Execute one model-issued tool call.
    ///
    /// Always produces a reply: argument-parse failures, unknown names, and
    /// handler errors all become `{"error": ...}` payloads for the call id.
    pub async fn dispatch(&self, call: &ToolCallRequest) -> ToolReply {
        let args: serde_json::Value = match serde_json::from_str(&call.arguments) {
            Ok(v) => v,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool arguments failed to parse");
                return error_reply(
                    &call.call_id,
                    &format!("invalid arguments for '{}': {e}", call.name),
                );
            }
        };

        let Some(handler) = self.handlers.get(&call.name) else {
            warn!(tool = %call.name, "Unknown tool requested by model");
            let err = ToolError::UnknownTool(call.name.clone());
            return error_reply(&call.call_id, &err.to_string());
        };

        match handler.execute(args).await {
            Ok(output) => ToolReply {
                call_id: call.call_id.clone(),
                output: output.value,
                trials: output.trials,
            },
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                error_reply(&call.call_id, &e.to_string())
            }
        }
    }

    /// List all registered operation names.
    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn error_reply(call_id: &str, message: &str) -> ToolReply {
    ToolReply {
        call_id: call_id.to_string(),
        output: serde_json::json!({ "error": message }),
        trials: Vec::new(),
    }
}
