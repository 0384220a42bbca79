//! `get_trial_treatments` — named interventions from the public registry.

use async_trait::async_trait;
use std::sync::Arc;
use trialscout_core::error::ToolError;
use trialscout_core::source::Registry;
use trialscout_core::tool::{ToolHandler, ToolOutput};

const MAX_DESCRIPTION_CHARS: usize = 200;

pub struct GetTrialTreatmentsHandler {
    registry: Arc<dyn Registry>,
}

impl GetTrialTreatmentsHandler {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self { registry }
    }
}

/// Truncate on a char boundary, appending an ellipsis when cut.
fn truncate_description(text: &str) -> String {
    if text.chars().count() <= MAX_DESCRIPTION_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_DESCRIPTION_CHARS).collect();
    format!("{cut}…")
}

#[async_trait]
impl ToolHandler for GetTrialTreatmentsHandler {
    fn name(&self) -> &str {
        "get_trial_treatments"
    }

    fn description(&self) -> &str {
        "List the treatments and interventions being studied in a trial, with type and a short description of each."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "nctId": {
                    "type": "string",
                    "description": "The registry identifier, e.g. \"NCT04379596\""
                }
            },
            "required": ["nctId"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let nct_id = args["nctId"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("missing 'nctId'".into()))?;

        let Some(study) = self.registry.fetch(nct_id).await? else {
            return Ok(ToolOutput::value(serde_json::json!({
                "error": format!("No registry record found for {nct_id}"),
            })));
        };

        let treatments: Vec<serde_json::Value> = study
            .interventions
            .iter()
            .map(|i| {
                serde_json::json!({
                    "name": i.name,
                    "type": i.intervention_type,
                    "description": i.description.as_deref().map(truncate_description),
                })
            })
            .collect();

        Ok(ToolOutput::value(serde_json::json!({
            "nctId": study.nct_id,
            "title": study.title,
            "treatments": treatments,
        })))
    }
}
