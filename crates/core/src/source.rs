//! External data source traits — the primary trial source and the public
//! registry.
//!
//! Both are treated as simple request/response collaborators: HTTP transport
//! details live in `trialscout-sources`, and every failure surfaces as a
//! typed error that the tool executor converts into an error payload.

use crate::error::{RegistryError, SourceError};
use crate::trial::TrialRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A cancer type known to the trial source taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancerType {
    /// Display label (e.g., "Breast Cancer")
    pub label: String,

    /// The query string accepted by `TrialSource::search`
    pub query_value: String,

    /// Whether this type is currently searchable
    #[serde(default)]
    pub enabled: bool,

    /// Position in the source-defined display order
    #[serde(default)]
    pub display_order: u32,
}

/// One page of search results from the trial source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    pub total_count: usize,
    pub page: usize,
    pub page_count: usize,
    pub records: Vec<TrialRecord>,
}

/// The primary trial search service.
#[async_trait]
pub trait TrialSource: Send + Sync {
    /// List the cancer-type taxonomy, including disabled entries.
    async fn list_cancer_types(&self) -> Result<Vec<CancerType>, SourceError>;

    /// Fetch one page of trials matching a cancer type.
    async fn search(&self, cancer_type: &str, page: usize) -> Result<SearchPage, SourceError>;

    /// Fetch a single trial by its internal identifier.
    async fn get_detail(&self, id: &str) -> Result<TrialRecord, SourceError>;

    /// Canonical patient-facing link for a trial on the source portal.
    fn portal_url(&self, id: &str) -> String;
}

/// A study record from the public registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryStudy {
    /// Registry identifier (e.g., "NCT04379596")
    pub nct_id: String,

    pub title: String,

    /// Overall status (e.g., "RECRUITING")
    #[serde(default)]
    pub overall_status: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_age: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_age: Option<String>,

    /// Sex restriction ("ALL", "FEMALE", "MALE")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,

    /// The raw eligibility criteria text block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligibility_criteria: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interventions: Vec<Intervention>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<RegistryLocation>,
}

/// A named intervention in a registry study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    pub name: String,

    /// Intervention type (e.g., "DRUG", "RADIATION")
    #[serde(default)]
    pub intervention_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A study location in a registry record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryLocation {
    pub facility: String,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub state: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// The public clinical-trials registry.
///
/// Used as the eligibility/treatment detail source and as the backstop
/// search target when the primary source has no geographic coverage.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Fetch a single study by registry id. `Ok(None)` when the registry
    /// has no such record — not-found is a normal outcome, not an error.
    async fn fetch(&self, nct_id: &str) -> Result<Option<RegistryStudy>, RegistryError>;

    /// Search the registry across all institutions.
    async fn search(
        &self,
        condition: &str,
        location: Option<&str>,
        radius_miles: u32,
        max: usize,
    ) -> Result<Vec<RegistryStudy>, RegistryError>;

    /// Canonical public link for a study on the registry.
    fn study_url(&self, nct_id: &str) -> String;
}
