//! `get_trial_eligibility` — eligibility summary from the public registry.
//!
//! The registry's criteria text is a single block; it is split into an
//! inclusion and an exclusion section by locating the respective headers.
//! When neither header is present the whole block is treated as inclusion
//! criteria. Only the leading bullets of each section are returned — the
//! agent surfaces raw criteria text for a human to read, it never renders
//! an eligibility verdict.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use trialscout_core::error::ToolError;
use trialscout_core::source::Registry;
use trialscout_core::tool::{ToolHandler, ToolOutput};

const MAX_INCLUSION: usize = 5;
const MAX_EXCLUSION: usize = 3;

pub struct GetTrialEligibilityHandler {
    registry: Arc<dyn Registry>,
}

impl GetTrialEligibilityHandler {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self { registry }
    }
}

/// A registry id is "NCT" followed by exactly eight digits.
fn is_valid_nct(id: &str) -> bool {
    let Some(digits) = id.strip_prefix("NCT") else {
        return false;
    };
    digits.len() == 8 && digits.chars().all(|c| c.is_ascii_digit())
}

/// Byte offset of `header` in `text`, matched ASCII-case-insensitively.
///
/// Offsets index `text` itself, so multibyte characters elsewhere in the
/// block never shift the split point. The header is ASCII, so a match
/// always starts on a char boundary.
fn find_header(text: &str, header: &str) -> Option<usize> {
    text.as_bytes()
        .windows(header.len())
        .position(|window| window.eq_ignore_ascii_case(header.as_bytes()))
}

/// Split a criteria block into inclusion and exclusion bullet lists.
fn split_criteria(text: &str) -> (Vec<String>, Vec<String>) {
    let inclusion_at = find_header(text, "inclusion criteria");
    let exclusion_at = find_header(text, "exclusion criteria");

    let (inclusion_block, exclusion_block) = match (inclusion_at, exclusion_at) {
        (Some(i), Some(e)) if i <= e => (&text[i..e], &text[e..]),
        (Some(i), Some(e)) => (&text[i..], &text[e..i]),
        (Some(i), None) => (&text[i..], ""),
        (None, Some(e)) => (&text[..e], &text[e..]),
        // No headers: the whole block is inclusion criteria
        (None, None) => (text, ""),
    };

    (bullets(inclusion_block), bullets(exclusion_block))
}

/// Extract bullet lines from a section, skipping the header line itself.
fn bullets(block: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            find_header(line, "inclusion criteria").is_none()
                && find_header(line, "exclusion criteria").is_none()
        })
        .map(|line| {
            line.trim_start_matches(['*', '-', '•'])
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

#[async_trait]
impl ToolHandler for GetTrialEligibilityHandler {
    fn name(&self) -> &str {
        "get_trial_eligibility"
    }

    fn description(&self) -> &str {
        "Get the eligibility requirements for a trial from the public registry: age range, sex restriction, and the leading inclusion and exclusion criteria."
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

        // Short-circuit before any network call
        if !is_valid_nct(nct_id) {
            debug!(nct_id, "Malformed registry id, skipping fetch");
            return Ok(ToolOutput::value(serde_json::Value::Null));
        }

        let Some(study) = self.registry.fetch(nct_id).await? else {
            return Ok(ToolOutput::value(serde_json::json!({
                "error": format!("No registry record found for {nct_id}"),
            })));
        };

        let (mut inclusion, mut exclusion) = study
            .eligibility_criteria
            .as_deref()
            .map(split_criteria)
            .unwrap_or_default();
        inclusion.truncate(MAX_INCLUSION);
        exclusion.truncate(MAX_EXCLUSION);

        Ok(ToolOutput::value(serde_json::json!({
            "nctId": study.nct_id,
            "title": study.title,
            "minimumAge": study.minimum_age,
            "maximumAge": study.maximum_age,
            "sex": study.sex,
            "inclusionCriteria": inclusion,
            "exclusionCriteria": exclusion,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockRegistry;
    use trialscout_core::source::RegistryStudy;

    fn registry_with(study: RegistryStudy) -> Arc<MockRegistry> {
        Arc::new(MockRegistry {
            studies: vec![study],
            ..Default::default()
        })
    }

    fn study(criteria: &str) -> RegistryStudy {
        RegistryStudy {
            nct_id: "NCT04379596".into(),
            title: "A Breast Cancer Study".into(),
            minimum_age: Some("18 Years".into()),
            maximum_age: None,
            sex: Some("FEMALE".into()),
            eligibility_criteria: Some(criteria.into()),
            ..Default::default()
        }
    }

    #[test]
    fn nct_pattern_validation() {
        assert!(is_valid_nct("NCT04379596"));
        assert!(!is_valid_nct("NCT1234"));
        assert!(!is_valid_nct("NCT1234567X"));
        assert!(!is_valid_nct("nct04379596"));
        assert!(!is_valid_nct("04379596"));
    }

    #[test]
    fn criteria_split_on_headers() {
        let text = "Inclusion Criteria:\n* Age 18 or older\n* Confirmed diagnosis\n\nExclusion Criteria:\n* Prior chemotherapy\n* Pregnancy";
        let (inclusion, exclusion) = split_criteria(text);
        assert_eq!(inclusion, vec!["Age 18 or older", "Confirmed diagnosis"]);
        assert_eq!(exclusion, vec!["Prior chemotherapy", "Pregnancy"]);
    }

    #[test]
    fn multibyte_text_before_headers_does_not_shift_the_split() {
        let text = "Für Erwachsene — Zusammenfassung für Patienten.\n\nINCLUSION CRITERIA:\n* Age 18 or older\n\nExclusion Criteria:\n* Prior chemotherapy";
        let (inclusion, exclusion) = split_criteria(text);
        assert_eq!(inclusion, vec!["Age 18 or older"]);
        assert_eq!(exclusion, vec!["Prior chemotherapy"]);
    }

    #[test]
    fn headerless_text_is_all_inclusion() {
        let text = "* Age 18 or older\n* ECOG 0-1";
        let (inclusion, exclusion) = split_criteria(text);
        assert_eq!(inclusion.len(), 2);
        assert!(exclusion.is_empty());
    }

    #[tokio::test]
    async fn malformed_id_short_circuits_to_null() {
        let registry = Arc::new(MockRegistry::default());
        let handler = GetTrialEligibilityHandler::new(registry);
        let output = handler
            .execute(serde_json::json!({"nctId": "not-an-id"}))
            .await
            .unwrap();
        assert!(output.value.is_null());
    }

    #[tokio::test]
    async fn not_found_yields_error_payload() {
        let registry = Arc::new(MockRegistry::default());
        let handler = GetTrialEligibilityHandler::new(registry);
        let output = handler
            .execute(serde_json::json!({"nctId": "NCT00000000"}))
            .await
            .unwrap();
        assert!(output.value["error"]
            .as_str()
            .unwrap()
            .contains("NCT00000000"));
    }

    #[tokio::test]
    async fn criteria_are_capped() {
        let many: Vec<String> = (1..=10).map(|i| format!("* Criterion {i}")).collect();
        let text = format!(
            "Inclusion Criteria:\n{}\nExclusion Criteria:\n{}",
            many.join("\n"),
            many.join("\n")
        );
        let handler = GetTrialEligibilityHandler::new(registry_with(study(&text)));
        let output = handler
            .execute(serde_json::json!({"nctId": "NCT04379596"}))
            .await
            .unwrap();
        assert_eq!(output.value["inclusionCriteria"].as_array().unwrap().len(), 5);
        assert_eq!(output.value["exclusionCriteria"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn age_and_sex_are_surfaced() {
        let handler =
            GetTrialEligibilityHandler::new(registry_with(study("Inclusion Criteria:\n* Adult")));
        let output = handler
            .execute(serde_json::json!({"nctId": "NCT04379596"}))
            .await
            .unwrap();
        assert_eq!(output.value["minimumAge"], "18 Years");
        assert_eq!(output.value["sex"], "FEMALE");
        assert!(output.value["maximumAge"].is_null());
    }
}
