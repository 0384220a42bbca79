//! Trial domain types — raw records and projected summaries.
//!
//! `TrialRecord` is what the Trial Source returns; it is transient and lives
//! only inside cache entries and tool outputs. `TrialView` is the projected,
//! caller-facing shape: an explicit tagged variant (slim or full) rather
//! than an optional-field union, so rendering code can match on `kind`
//! instead of probing which fields happen to be present.

use serde::{Deserialize, Serialize};

/// A raw trial record as fetched from the primary trial source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Internal study identifier (e.g., "BRE-430-001")
    pub id: String,

    /// Display name shown to patients
    pub name: String,

    /// Full scientific title
    #[serde(default)]
    pub title: String,

    /// Public registry identifier (e.g., "NCT04379596")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nct_id: Option<String>,

    /// Trial phases (e.g., ["Phase 2", "Phase 3"])
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phases: Vec<String>,

    /// Cancer-type tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cancer_types: Vec<String>,

    /// Participating sites
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sites: Vec<TrialSite>,
}

/// A participating site within a trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialSite {
    pub name: String,
    pub city: String,
    pub state: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// The closest site to the patient's origin, with computed distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosestSite {
    pub name: String,
    pub city: String,
    pub state: String,

    /// Great-circle distance from the origin ZIP, when resolvable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Reduced trial view for quick scanning in search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlimTrial {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nct_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phases: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closest_city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closest_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,

    /// Canonical link to the trial on the source portal
    pub portal_url: String,
}

/// Complete trial view produced by a detail lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullTrial {
    pub id: String,
    pub name: String,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nct_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phases: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cancer_types: Vec<String>,

    pub location_count: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closest_location: Option<ClosestSite>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<TrialSite>,

    /// Canonical link to the trial on the source portal
    pub portal_url: String,

    /// Canonical link to the public registry entry, when an NCT id exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,
}

/// A projected trial, tagged by how much detail it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TrialView {
    Slim(SlimTrial),
    Full(FullTrial),
}

impl TrialView {
    /// The internal study identifier, regardless of projection depth.
    pub fn id(&self) -> &str {
        match self {
            TrialView::Slim(t) => &t.id,
            TrialView::Full(t) => &t.id,
        }
    }

    /// Distance to the closest site, when one was resolvable.
    pub fn distance_miles(&self) -> Option<f64> {
        match self {
            TrialView::Slim(t) => t.distance_miles,
            TrialView::Full(t) => t.closest_location.as_ref().and_then(|c| c.distance_miles),
        }
    }
}
