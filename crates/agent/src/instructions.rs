//! System instruction assembly — static behavioral prompt plus the
//! per-conversation patient profile context.

use trialscout_core::profile::PatientProfile;

/// The static behavioral prompt sent on every model call.
pub const SYSTEM_PROMPT: &str = "\
You are TrialScout, a helpful assistant that guides patients through \
finding clinical trials for cancer treatment.

Guidelines:
- Use the provided tools to search for trials, look up details, and fetch \
eligibility and treatment information. Never invent trial names, IDs, or \
locations.
- When the patient has not given a cancer type or location, ask for them \
conversationally before searching.
- Present results in plain language: trial name, phase, nearest location \
with distance when available, and a link.
- Eligibility criteria are informational only. Encourage the patient to \
discuss specific trials with their care team; never state whether the \
patient qualifies.
- If a search near the patient finds nothing, offer to search all \
locations nationwide.
- Be warm and concise. This is a stressful topic for most patients.";

/// Fallback answer when a final model response carries no text.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I wasn't able to put together a response. Could you rephrase your question?";

/// Compose the instruction block for one model call.
pub fn build_instructions(profile: Option<&PatientProfile>) -> String {
    match profile {
        Some(p) => format!("{SYSTEM_PROMPT}{}", p.context_block()),
        None => SYSTEM_PROMPT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_without_profile_are_the_static_prompt() {
        assert_eq!(build_instructions(None), SYSTEM_PROMPT);
    }

    #[test]
    fn instructions_append_profile_context() {
        let profile = PatientProfile {
            cancer_type: Some("Breast".into()),
            zip_code: Some("37203".into()),
            ..Default::default()
        };
        let instructions = build_instructions(Some(&profile));
        assert!(instructions.starts_with(SYSTEM_PROMPT));
        assert!(instructions.contains("Patient Profile"));
        assert!(instructions.contains("37203"));
    }

    #[test]
    fn empty_profile_adds_nothing() {
        let profile = PatientProfile::default();
        assert_eq!(build_instructions(Some(&profile)), SYSTEM_PROMPT);
    }
}
