//! `search_all_locations` — backstop search across the public registry.
//!
//! Used when the primary source has nothing near the patient. The registry
//! search is already status-filtered server-side; the filter is re-applied
//! here because the upstream filter parameter has changed shape before.
//! When the registry rejects a location-filtered query, the search is
//! retried once without the location rather than failing the tool call.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use trialscout_core::error::{RegistryError, ToolError};
use trialscout_core::source::{Registry, RegistryStudy};
use trialscout_core::tool::{ToolHandler, ToolOutput};
use trialscout_core::trial::{SlimTrial, TrialView};

use crate::SearchLimits;

const ACTIVE_STATUSES: [&str; 3] = ["RECRUITING", "NOT_YET_RECRUITING", "ACTIVE_NOT_RECRUITING"];

pub struct SearchAllLocationsHandler {
    registry: Arc<dyn Registry>,
    limits: SearchLimits,
}

impl SearchAllLocationsHandler {
    pub fn new(registry: Arc<dyn Registry>, limits: SearchLimits) -> Self {
        Self { registry, limits }
    }

    fn project(&self, study: &RegistryStudy) -> SlimTrial {
        let first = study.locations.first();
        SlimTrial {
            id: study.nct_id.clone(),
            name: study.title.clone(),
            nct_id: Some(study.nct_id.clone()),
            phases: vec![],
            closest_city: first.map(|l| l.city.clone()),
            closest_state: first.map(|l| l.state.clone()),
            distance_miles: None,
            portal_url: self.registry.study_url(&study.nct_id),
        }
    }
}

#[async_trait]
impl ToolHandler for SearchAllLocationsHandler {
    fn name(&self) -> &str {
        "search_all_locations"
    }

    fn description(&self) -> &str {
        "Search the public registry for actively enrolling trials at any institution nationwide. Use this when search_trials finds nothing near the patient."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "condition": {
                    "type": "string",
                    "description": "Condition or cancer type to search for"
                },
                "location": {
                    "type": "string",
                    "description": "City, state, or ZIP code to search near (omit for a nationwide search)"
                },
                "radiusMiles": {
                    "type": "integer",
                    "description": "Search radius around the location, in miles"
                }
            },
            "required": ["condition"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let condition = args["condition"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("missing 'condition'".into()))?;
        let location = args["location"].as_str();
        let radius = args["radiusMiles"]
            .as_u64()
            .map(|r| r as u32)
            .unwrap_or(self.limits.default_radius_miles);
        let max = self.limits.max_registry_results;

        let studies = match self.registry.search(condition, location, radius, max).await {
            Ok(studies) => studies,
            // Retry once without the location filter before giving up
            Err(RegistryError::FilterRejected(reason)) if location.is_some() => {
                warn!(
                    condition,
                    location = location.unwrap_or_default(),
                    reason,
                    "Registry rejected location filter, retrying nationwide"
                );
                self.registry.search(condition, None, radius, max).await?
            }
            Err(e) => return Err(e.into()),
        };

        let mut active: Vec<&RegistryStudy> = studies
            .iter()
            .filter(|s| ACTIVE_STATUSES.contains(&s.overall_status.as_str()))
            .collect();
        active.truncate(max);

        debug!(
            condition,
            found = studies.len(),
            returned = active.len(),
            "Registry search completed"
        );

        let views: Vec<TrialView> = active
            .iter()
            .map(|s| TrialView::Slim(self.project(s)))
            .collect();
        let value = serde_json::json!({
            "totalFound": views.len(),
            "trials": serde_json::to_value(&views).map_err(|e| ToolError::ExecutionFailed {
                tool_name: "search_all_locations".into(),
                reason: e.to_string(),
            })?,
        });

        Ok(ToolOutput::with_trials(value, views))
    }
}
