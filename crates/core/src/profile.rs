//! Patient profile — optional attributes describing the requester.
//!
//! The profile is an immutable snapshot per conversation: callers replace it
//! wholesale via `set_patient_profile`, the core never merges partial
//! updates. Merging, if a caller wants it, happens before handing in a new
//! snapshot.

use serde::{Deserialize, Serialize};

/// Optional attributes describing the patient searching for trials.
///
/// Every field is optional — the agent works with whatever it has and asks
/// the model to elicit the rest conversationally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    /// Primary cancer type (e.g., "Breast", "Lung")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancer_type: Option<String>,

    /// Subtype or histology (e.g., "Triple-negative")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,

    /// Disease stage (e.g., "Stage II")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    /// Home postal code, used as the default search origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,

    /// How far the patient is willing to travel, in miles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_radius_miles: Option<u32>,

    /// Patient age in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    /// Prior treatments received (free text, one per entry)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prior_treatments: Vec<String>,

    /// Free-text preferences (e.g., "prefers non-chemotherapy options")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<String>,
}

impl PatientProfile {
    /// Render the profile as a context block for the system instructions.
    ///
    /// Returns an empty string when no field is set, so callers can append
    /// unconditionally.
    pub fn context_block(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ct) = &self.cancer_type {
            lines.push(format!("- Cancer type: {ct}"));
        }
        if let Some(st) = &self.subtype {
            lines.push(format!("- Subtype: {st}"));
        }
        if let Some(stage) = &self.stage {
            lines.push(format!("- Stage: {stage}"));
        }
        if let Some(zip) = &self.zip_code {
            lines.push(format!("- Home ZIP code: {zip}"));
        }
        if let Some(radius) = self.travel_radius_miles {
            lines.push(format!("- Willing to travel: {radius} miles"));
        }
        if let Some(age) = self.age {
            lines.push(format!("- Age: {age}"));
        }
        if !self.prior_treatments.is_empty() {
            lines.push(format!(
                "- Prior treatments: {}",
                self.prior_treatments.join(", ")
            ));
        }
        if let Some(prefs) = &self.preferences {
            lines.push(format!("- Preferences: {prefs}"));
        }

        if lines.is_empty() {
            String::new()
        } else {
            format!("\n\n## Patient Profile\n{}", lines.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_yields_empty_context() {
        let profile = PatientProfile::default();
        assert!(profile.context_block().is_empty());
    }

    #[test]
    fn context_block_includes_set_fields() {
        let profile = PatientProfile {
            cancer_type: Some("Breast".into()),
            zip_code: Some("37203".into()),
            travel_radius_miles: Some(50),
            ..Default::default()
        };
        let block = profile.context_block();
        assert!(block.contains("Patient Profile"));
        assert!(block.contains("Breast"));
        assert!(block.contains("37203"));
        assert!(block.contains("50 miles"));
        assert!(!block.contains("Stage"));
    }

    #[test]
    fn profile_serialization_skips_unset_fields() {
        let profile = PatientProfile {
            cancer_type: Some("Lung".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("Lung"));
        assert!(!json.contains("stage"));
        assert!(!json.contains("preferences"));
    }
}
