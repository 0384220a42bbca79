//! Error types for the TrialScout domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all TrialScout operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Model endpoint errors ---
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    // --- Trial source errors ---
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    // --- Registry errors ---
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Session state errors ---
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by model endpoint, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("Trial API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Trial not found: {0}")]
    NotFound(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("Registry request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Registry rejected the search filter: {0}")]
    FilterRejected(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool execution failed for {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Tool schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupted session slot: {0}")]
    Corrupted(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_error_displays_correctly() {
        let err = Error::Model(ModelError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn tool_error_wraps_source_error() {
        let err = ToolError::from(SourceError::NotFound("BRE-430".into()));
        assert!(err.to_string().contains("BRE-430"));
    }

    #[test]
    fn execution_failure_displays_tool_and_reason() {
        let err = ToolError::ExecutionFailed {
            tool_name: "search_trials".into(),
            reason: "upstream unavailable".into(),
        };
        assert_eq!(
            err.to_string(),
            "Tool execution failed for search_trials: upstream unavailable"
        );
    }

    #[test]
    fn unknown_tool_displays_name() {
        let err = Error::Tool(ToolError::UnknownTool("frobnicate".into()));
        assert!(err.to_string().contains("frobnicate"));
    }
}
