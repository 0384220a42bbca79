//! The conversation turn loop.

use crate::instructions::{build_instructions, FALLBACK_REPLY};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use trialscout_core::agent::{ConversationState, TurnReply};
use trialscout_core::error::Error;
use trialscout_core::model::{InputItem, ModelEndpoint, ModelInput, ModelRequest, ModelResponse};
use trialscout_core::profile::PatientProfile;
use trialscout_core::session::SessionStore;
use trialscout_core::tool::ToolRegistry;
use trialscout_core::trial::TrialView;
use trialscout_tools::ProfileHandle;

const DEFAULT_MAX_TOOL_ROUNDS: usize = 10;

/// The conversation orchestrator.
///
/// One instance serves one conversation at a time; concurrent turns on the
/// same instance are not supported.
pub struct TrialAgent {
    endpoint: Arc<dyn ModelEndpoint>,
    model: String,
    tools: Arc<ToolRegistry>,
    profile: ProfileHandle,
    session: Arc<dyn SessionStore>,
    token: RwLock<Option<String>>,
    max_tool_rounds: usize,
}

impl TrialAgent {
    /// Create an agent, restoring any persisted continuation token.
    pub async fn new(
        endpoint: Arc<dyn ModelEndpoint>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
        profile: ProfileHandle,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, Error> {
        let token = session.restore().await?;
        if token.is_some() {
            info!(store = session.name(), "Resuming persisted conversation");
        }

        Ok(Self {
            endpoint,
            model: model.into(),
            tools,
            profile,
            session,
            token: RwLock::new(token),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        })
    }

    /// Set the maximum number of tool rounds per turn.
    pub fn with_max_tool_rounds(mut self, max: usize) -> Self {
        self.max_tool_rounds = max;
        self
    }

    /// Replace the patient profile snapshot for subsequent turns.
    pub async fn set_patient_profile(&self, profile: PatientProfile) {
        *self.profile.write().await = Some(profile);
    }

    /// The observable conversation state.
    pub async fn conversation_state(&self) -> ConversationState {
        let token = self.token.read().await.clone();
        ConversationState {
            active: token.is_some(),
            continuation_token: token,
        }
    }

    /// Install a continuation token, replacing any current one.
    pub async fn restore_conversation_state(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    /// End the conversation: clear the token and the session slot.
    ///
    /// The trial cache is deliberately left warm; records fetched in the
    /// previous conversation are still valid lookups.
    pub async fn reset_conversation(&self) -> Result<(), Error> {
        *self.token.write().await = None;
        self.session.clear().await?;
        info!("Conversation reset");
        Ok(())
    }

    /// Process one user turn to completion.
    ///
    /// Runs the model/tool loop until the model answers with text, then
    /// installs and persists the final response id as the new continuation
    /// token. A failed model call leaves the previous token untouched.
    pub async fn chat(&self, user_text: &str) -> Result<TurnReply, Error> {
        let instructions = {
            let profile = self.profile.read().await;
            build_instructions(profile.as_ref())
        };
        let schemas = self.tools.schemas();
        let previous = self.token.read().await.clone();

        // With a continuation the server already holds the history, so raw
        // text suffices; a fresh conversation sends a structured first turn.
        let input = match &previous {
            Some(_) => ModelInput::Text(user_text.to_string()),
            None => ModelInput::Items(vec![InputItem::user(user_text)]),
        };

        let mut request = ModelRequest {
            model: self.model.clone(),
            instructions: instructions.clone(),
            input,
            tools: schemas.clone(),
            previous_response_id: previous,
        };

        let mut trials: Vec<TrialView> = Vec::new();
        let mut rounds = 0;

        let (response, truncated) = loop {
            let response = self.endpoint.respond(request).await?;
            let calls: Vec<_> = response.tool_calls().into_iter().cloned().collect();

            if calls.is_empty() {
                break (response, false);
            }
            if rounds >= self.max_tool_rounds {
                warn!(
                    rounds,
                    "Tool-round safety bound reached, completing with partial answer"
                );
                break (response, true);
            }
            rounds += 1;

            debug!(round = rounds, calls = calls.len(), "Executing tool batch");

            // Sequential, in received order: later calls may read cache
            // state written by earlier ones
            let mut outputs = Vec::with_capacity(calls.len());
            for call in &calls {
                let reply = self.tools.dispatch(call).await;
                trials.extend(reply.trials);
                outputs.push(InputItem::function_output(
                    reply.call_id,
                    reply.output.to_string(),
                ));
            }

            request = ModelRequest {
                model: self.model.clone(),
                instructions: instructions.clone(),
                input: ModelInput::Items(outputs),
                tools: schemas.clone(),
                previous_response_id: Some(response.id),
            };
        };

        self.complete_turn(response, trials, truncated).await
    }

    async fn complete_turn(
        &self,
        response: ModelResponse,
        trials: Vec<TrialView>,
        truncated: bool,
    ) -> Result<TurnReply, Error> {
        let text = response.text().unwrap_or_else(|| FALLBACK_REPLY.to_string());

        *self.token.write().await = Some(response.id.clone());
        self.session.save(&response.id).await?;

        debug!(token = %response.id, truncated, "Turn completed");
        Ok(TurnReply {
            text,
            trials,
            truncated,
        })
    }
}
