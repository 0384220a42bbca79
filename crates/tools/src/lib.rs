//! Tool handler implementations for TrialScout.
//!
//! Six operations, matching the schemas advertised to the model:
//! `search_trials`, `get_trial_details`, `get_trial_eligibility`,
//! `get_trial_treatments`, `list_cancer_types`, `search_all_locations`.
//!
//! Handlers share their collaborators through [`ToolDeps`]; the patient
//! profile handle is the same one the orchestrator writes through, so a
//! profile update is visible to the next tool call without re-wiring.

mod cancer_types;
mod details;
mod eligibility;
mod project;
mod registry_search;
mod search;
mod treatments;

#[cfg(test)]
pub(crate) mod test_support;

pub use cancer_types::ListCancerTypesHandler;
pub use details::GetTrialDetailsHandler;
pub use eligibility::GetTrialEligibilityHandler;
pub use project::{project_full, project_slim};
pub use registry_search::SearchAllLocationsHandler;
pub use search::SearchTrialsHandler;
pub use treatments::GetTrialTreatmentsHandler;

use std::sync::Arc;
use tokio::sync::RwLock;
use trialscout_core::cache::TrialCache;
use trialscout_core::profile::PatientProfile;
use trialscout_core::source::{Registry, TrialSource};
use trialscout_core::tool::ToolRegistry;

/// Shared handle to the current patient profile snapshot.
pub type ProfileHandle = Arc<RwLock<Option<PatientProfile>>>;

/// Collaborators shared by the tool handlers.
#[derive(Clone)]
pub struct ToolDeps {
    pub source: Arc<dyn TrialSource>,
    pub registry: Arc<dyn Registry>,
    pub cache: Arc<TrialCache>,
    pub profile: ProfileHandle,
}

/// Result-count caps and defaults.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    /// Maximum trials returned by `search_trials`
    pub max_search_results: usize,

    /// Maximum studies returned by `search_all_locations`
    pub max_registry_results: usize,

    /// Default radius for the backstop search, in miles
    pub default_radius_miles: u32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_search_results: 20,
            max_registry_results: 10,
            default_radius_miles: 100,
        }
    }
}

/// Build a registry with all six handlers installed.
pub fn build_registry(deps: &ToolDeps, limits: SearchLimits) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(SearchTrialsHandler::new(deps.clone(), limits)));
    registry.register(Arc::new(GetTrialDetailsHandler::new(deps.clone())));
    registry.register(Arc::new(GetTrialEligibilityHandler::new(Arc::clone(
        &deps.registry,
    ))));
    registry.register(Arc::new(GetTrialTreatmentsHandler::new(Arc::clone(
        &deps.registry,
    ))));
    registry.register(Arc::new(ListCancerTypesHandler::new(Arc::clone(
        &deps.source,
    ))));
    registry.register(Arc::new(SearchAllLocationsHandler::new(
        Arc::clone(&deps.registry),
        limits,
    )));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockRegistry, MockTrialSource};

    #[test]
    fn registry_contains_all_six_operations() {
        let deps = ToolDeps {
            source: Arc::new(MockTrialSource::default()),
            registry: Arc::new(MockRegistry::default()),
            cache: Arc::new(TrialCache::new()),
            profile: Arc::new(RwLock::new(None)),
        };
        let registry = build_registry(&deps, SearchLimits::default());

        let mut names = registry.names();
        names.sort();
        assert_eq!(
            names,
            vec![
                "get_trial_details",
                "get_trial_eligibility",
                "get_trial_treatments",
                "list_cancer_types",
                "search_all_locations",
                "search_trials",
            ]
        );
    }

    #[test]
    fn registry_validates_against_own_schemas() {
        let deps = ToolDeps {
            source: Arc::new(MockTrialSource::default()),
            registry: Arc::new(MockRegistry::default()),
            cache: Arc::new(TrialCache::new()),
            profile: Arc::new(RwLock::new(None)),
        };
        let registry = build_registry(&deps, SearchLimits::default());
        let schemas = registry.schemas();
        assert!(registry.validate_against(&schemas).is_ok());
    }
}
