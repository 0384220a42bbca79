//! `search_trials` — page-one search against the primary trial source.
//!
//! Every returned record is cached (aliased by id and uppercased name)
//! under the supplied or profile-default ZIP, so a later detail lookup in
//! the same conversation resolves without a refetch. Results are projected
//! slim, sorted by distance ascending when the origin resolves, and capped.

use crate::project::project_slim;
use crate::{SearchLimits, ToolDeps};
use async_trait::async_trait;
use tracing::debug;
use trialscout_core::error::ToolError;
use trialscout_core::tool::{ToolHandler, ToolOutput};
use trialscout_core::trial::TrialView;

pub struct SearchTrialsHandler {
    deps: ToolDeps,
    limits: SearchLimits,
}

impl SearchTrialsHandler {
    pub fn new(deps: ToolDeps, limits: SearchLimits) -> Self {
        Self { deps, limits }
    }
}

#[async_trait]
impl ToolHandler for SearchTrialsHandler {
    fn name(&self) -> &str {
        "search_trials"
    }

    fn description(&self) -> &str {
        "Search for clinical trials matching a cancer type, sorted by distance from a ZIP code when one is available. Returns a capped list of matching trials."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "cancerType": {
                    "type": "string",
                    "description": "Cancer type to search for (use list_cancer_types for valid values)"
                },
                "zipCode": {
                    "type": "string",
                    "description": "ZIP code to sort results by distance from (defaults to the patient's home ZIP)"
                }
            },
            "required": ["cancerType"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let cancer_type = args["cancerType"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("missing 'cancerType'".into()))?;

        let zip = match args["zipCode"].as_str() {
            Some(z) => Some(z.to_string()),
            None => self
                .deps
                .profile
                .read()
                .await
                .as_ref()
                .and_then(|p| p.zip_code.clone()),
        };

        let page = self.deps.source.search(cancer_type, 1).await?;
        self.deps.cache.put(&page.records, zip.as_deref()).await;

        let origin = zip.as_deref().and_then(trialscout_geo::lookup);

        let mut slim: Vec<_> = page
            .records
            .iter()
            .map(|r| project_slim(r, self.deps.source.portal_url(&r.id), origin))
            .collect();

        // Distance ascending; trials without a resolvable distance go last
        slim.sort_by(|a, b| {
            a.distance_miles
                .unwrap_or(f64::INFINITY)
                .partial_cmp(&b.distance_miles.unwrap_or(f64::INFINITY))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        slim.truncate(self.limits.max_search_results);

        debug!(
            cancer_type,
            total = page.total_count,
            returned = slim.len(),
            "Trial search completed"
        );

        let views: Vec<TrialView> = slim.into_iter().map(TrialView::Slim).collect();
        let value = serde_json::json!({
            "totalFound": page.total_count,
            "trials": serde_json::to_value(&views).map_err(|e| ToolError::ExecutionFailed {
                tool_name: "search_trials".into(),
                reason: e.to_string(),
            })?,
        });

        Ok(ToolOutput::with_trials(value, views))
    }
}
