//! `get_trial_details` — full summary for one trial.
//!
//! Resolution order: trial cache (exact → case-normalized → substring),
//! then a direct source fetch by id. Not-found after both paths is a normal
//! `{found: false}` payload, not an error.

use crate::project::project_full;
use crate::ToolDeps;
use async_trait::async_trait;
use tracing::debug;
use trialscout_core::error::{SourceError, ToolError};
use trialscout_core::tool::{ToolHandler, ToolOutput};
use trialscout_core::trial::TrialRecord;

pub struct GetTrialDetailsHandler {
    deps: ToolDeps,
}

impl GetTrialDetailsHandler {
    pub fn new(deps: ToolDeps) -> Self {
        Self { deps }
    }

    async fn resolve(&self, study_id: &str) -> Result<Option<(TrialRecord, Option<String>)>, ToolError> {
        if let Some(entry) = self.deps.cache.get(study_id).await {
            debug!(study_id, "Detail lookup served from cache");
            return Ok(Some((entry.record.clone(), entry.origin_zip.clone())));
        }

        match self.deps.source.get_detail(study_id).await {
            Ok(record) => {
                let zip = self
                    .deps
                    .profile
                    .read()
                    .await
                    .as_ref()
                    .and_then(|p| p.zip_code.clone());
                // Cache so the next lookup in this conversation is free
                self.deps.cache.put(&[record.clone()], zip.as_deref()).await;
                Ok(Some((record, zip)))
            }
            Err(SourceError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ToolHandler for GetTrialDetailsHandler {
    fn name(&self) -> &str {
        "get_trial_details"
    }

    fn description(&self) -> &str {
        "Get the full details of one clinical trial by its study ID or name, including all participating locations and contact phone numbers."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "studyId": {
                    "type": "string",
                    "description": "The study ID (e.g., \"BRE-430-001\") or display name of the trial"
                }
            },
            "required": ["studyId"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let study_id = args["studyId"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("missing 'studyId'".into()))?;

        let Some((record, zip)) = self.resolve(study_id).await? else {
            return Ok(ToolOutput::value(serde_json::json!({
                "found": false,
                "error": format!("No trial matching '{study_id}' was found"),
            })));
        };

        let origin = zip.as_deref().and_then(trialscout_geo::lookup);
        let registry_url = record
            .nct_id
            .as_deref()
            .map(|nct| self.deps.registry.study_url(nct));
        let full = project_full(
            &record,
            self.deps.source.portal_url(&record.id),
            registry_url,
            origin,
        );

        Ok(ToolOutput::value(serde_json::json!({
            "found": true,
            "trial": full,
        })))
    }
}
