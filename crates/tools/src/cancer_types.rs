//! `list_cancer_types` — the searchable cancer-type taxonomy.

use async_trait::async_trait;
use std::sync::Arc;
use trialscout_core::error::ToolError;
use trialscout_core::source::TrialSource;
use trialscout_core::tool::{ToolHandler, ToolOutput};

pub struct ListCancerTypesHandler {
    source: Arc<dyn TrialSource>,
}

impl ListCancerTypesHandler {
    pub fn new(source: Arc<dyn TrialSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ToolHandler for ListCancerTypesHandler {
    fn name(&self) -> &str {
        "list_cancer_types"
    }

    fn description(&self) -> &str {
        "List the cancer types that can be passed to search_trials, in display order."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let mut types = self.source.list_cancer_types().await?;

        // Disabled entries exist in the taxonomy but are not searchable
        types.retain(|t| t.enabled);
        types.sort_by_key(|t| t.display_order);

        let values: Vec<&str> = types.iter().map(|t| t.query_value.as_str()).collect();
        Ok(ToolOutput::value(serde_json::json!({
            "cancerTypes": values,
        })))
    }
}
