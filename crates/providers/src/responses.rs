//! OpenAI Responses API endpoint implementation.
//!
//! The Responses API keeps conversation state server-side: each call returns
//! a response `id`, and passing it back as `previous_response_id` resumes
//! the conversation without resending history. That id is exactly the
//! continuation token the orchestrator persists across restarts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use trialscout_core::error::ModelError;
use trialscout_core::model::{
    InputItem, ModelEndpoint, ModelInput, ModelRequest, ModelResponse, OutputItem, ToolCallRequest,
};

const DEFAULT_BASE: &str = "https://api.openai.com/v1";

/// An OpenAI Responses API endpoint.
pub struct ResponsesEndpoint {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ResponsesEndpoint {
    pub fn new(api_key: impl Into<String>, base_url: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url
                .unwrap_or(DEFAULT_BASE)
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    fn to_api_body(request: &ModelRequest) -> serde_json::Value {
        let input = match &request.input {
            ModelInput::Text(text) => serde_json::json!(text),
            ModelInput::Items(items) => {
                serde_json::json!(items.iter().map(ApiInputItem::from).collect::<Vec<_>>())
            }
        };

        let mut body = serde_json::json!({
            "model": request.model,
            "instructions": request.instructions,
            "input": input,
            "store": true,
        });

        if !request.tools.is_empty() {
            let tools: Vec<serde_json::Value> = request
                .tools
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "type": "function",
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    })
                })
                .collect();
            body["tools"] = serde_json::json!(tools);
        }

        if let Some(prev) = &request.previous_response_id {
            body["previous_response_id"] = serde_json::json!(prev);
        }

        body
    }
}

#[async_trait]
impl ModelEndpoint for ResponsesEndpoint {
    fn name(&self) -> &str {
        "openai-responses"
    }

    async fn respond(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = format!("{}/responses", self.base_url);
        let body = Self::to_api_body(&request);

        debug!(
            model = %request.model,
            continuing = request.previous_response_id.is_some(),
            "Sending model request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ModelError::RateLimited {
                retry_after_secs: 5,
            });
        }
        if status == 401 || status == 403 {
            return Err(ModelError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Model endpoint returned error");
            return Err(ModelError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ModelError::MalformedResponse(e.to_string()))?;

        Ok(api_response.into())
    }
}

// --- Responses API wire types (internal) ---

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiInputItem {
    Message { role: String, content: String },
    FunctionCallOutput { call_id: String, output: String },
}

impl From<&InputItem> for ApiInputItem {
    fn from(item: &InputItem) -> Self {
        match item {
            InputItem::Message { role, content } => ApiInputItem::Message {
                role: role.clone(),
                content: content.clone(),
            },
            InputItem::FunctionCallOutput { call_id, output } => {
                ApiInputItem::FunctionCallOutput {
                    call_id: call_id.clone(),
                    output: output.clone(),
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    output: Vec<ApiOutputItem>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiOutputItem {
    FunctionCall {
        call_id: String,
        name: String,
        arguments: String,
    },
    Message {
        #[serde(default)]
        content: Vec<ApiContentPart>,
    },
    // Reasoning items and other output types the orchestrator ignores
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiContentPart {
    OutputText {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl From<ApiResponse> for ModelResponse {
    fn from(resp: ApiResponse) -> Self {
        let output = resp
            .output
            .into_iter()
            .filter_map(|item| match item {
                ApiOutputItem::FunctionCall {
                    call_id,
                    name,
                    arguments,
                } => Some(OutputItem::FunctionCall(ToolCallRequest {
                    call_id,
                    name,
                    arguments,
                })),
                ApiOutputItem::Message { content } => {
                    let segments: Vec<String> = content
                        .into_iter()
                        .filter_map(|part| match part {
                            ApiContentPart::OutputText { text } => Some(text),
                            ApiContentPart::Other => None,
                        })
                        .collect();
                    Some(OutputItem::Message { content: segments })
                }
                ApiOutputItem::Other => {
                    trace!("Ignoring unrecognized output item");
                    None
                }
            })
            .collect();

        ModelResponse {
            id: resp.id,
            status: resp.status,
            output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialscout_core::model::ToolSchema;

    fn request(input: ModelInput, previous: Option<&str>) -> ModelRequest {
        ModelRequest {
            model: "gpt-4o".into(),
            instructions: "You are a helpful trial navigator.".into(),
            input,
            tools: vec![ToolSchema {
                name: "search_trials".into(),
                description: "Search for trials".into(),
                parameters: serde_json::json!({"type": "object"}),
            }],
            previous_response_id: previous.map(String::from),
        }
    }

    #[test]
    fn body_uses_plain_string_for_text_input() {
        let body = ResponsesEndpoint::to_api_body(&request(
            ModelInput::Text("find trials".into()),
            Some("resp_1"),
        ));
        assert_eq!(body["input"], serde_json::json!("find trials"));
        assert_eq!(body["previous_response_id"], "resp_1");
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["name"], "search_trials");
    }

    #[test]
    fn body_omits_previous_id_on_first_turn() {
        let body = ResponsesEndpoint::to_api_body(&request(
            ModelInput::Items(vec![InputItem::user("hello")]),
            None,
        ));
        assert!(body.get("previous_response_id").is_none());
        assert_eq!(body["input"][0]["type"], "message");
        assert_eq!(body["input"][0]["role"], "user");
    }

    #[test]
    fn body_serializes_function_outputs() {
        let body = ResponsesEndpoint::to_api_body(&request(
            ModelInput::Items(vec![InputItem::function_output("call_1", r#"{"ok":1}"#)]),
            Some("resp_2"),
        ));
        assert_eq!(body["input"][0]["type"], "function_call_output");
        assert_eq!(body["input"][0]["call_id"], "call_1");
    }

    #[test]
    fn parse_response_with_function_calls() {
        let data = r#"{
            "id": "resp_abc",
            "status": "completed",
            "output": [
                {"type": "reasoning", "summary": []},
                {"type": "function_call", "call_id": "call_1", "name": "search_trials",
                 "arguments": "{\"cancerType\":\"Breast\"}"}
            ]
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let response = ModelResponse::from(parsed);
        assert_eq!(response.id, "resp_abc");
        let calls = response.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "search_trials");
        // The reasoning item is dropped
        assert_eq!(response.output.len(), 1);
    }

    #[test]
    fn parse_response_with_text_message() {
        let data = r#"{
            "id": "resp_def",
            "status": "completed",
            "output": [
                {"type": "message", "content": [
                    {"type": "output_text", "text": "I found 3 trials."},
                    {"type": "output_text", "text": "The closest is in Nashville."}
                ]}
            ]
        }"#;
        let response = ModelResponse::from(serde_json::from_str::<ApiResponse>(data).unwrap());
        assert_eq!(
            response.text().unwrap(),
            "I found 3 trials.\nThe closest is in Nashville."
        );
        assert!(response.tool_calls().is_empty());
    }

    #[test]
    fn endpoint_name() {
        let endpoint = ResponsesEndpoint::new("sk-test", None);
        assert_eq!(endpoint.name(), "openai-responses");
        assert_eq!(endpoint.base_url, DEFAULT_BASE);
    }
}
