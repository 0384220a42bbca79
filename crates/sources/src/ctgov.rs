//! HTTP client for the ClinicalTrials.gov v2 API.
//!
//! Endpoints:
//! - `GET {base}/studies/{nctId}` — single study record
//! - `GET {base}/studies?query.cond=...` — registry-wide search
//!
//! Only the fields the tools consume are parsed; the v2 payload is much
//! larger.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use trialscout_core::error::RegistryError;
use trialscout_core::source::{Intervention, Registry, RegistryLocation, RegistryStudy};

const DEFAULT_BASE: &str = "https://clinicaltrials.gov/api/v2";
const STUDY_BASE: &str = "https://clinicaltrials.gov/study";

/// ClinicalTrials.gov v2 API client.
pub struct CtGovRegistry {
    base_url: String,
    client: reqwest::Client,
}

impl CtGovRegistry {
    pub fn new(base_url: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url
                .unwrap_or(DEFAULT_BASE)
                .trim_end_matches('/')
                .to_string(),
            client,
        }
    }

    async fn search_once(
        &self,
        condition: &str,
        location: Option<&str>,
        radius_miles: u32,
        max: usize,
    ) -> Result<Vec<RegistryStudy>, RegistryError> {
        let url = format!("{}/studies", self.base_url);
        let query = search_query(condition, location, radius_miles, max);

        debug!(condition, ?location, radius_miles, "Registry search");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::FilterRejected(body));
        }
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "Registry returned error");
            return Err(RegistryError::ApiError {
                status_code: status,
                message: body,
            });
        }

        let page: ApiStudyPage = response
            .json()
            .await
            .map_err(|e| RegistryError::MalformedResponse(e.to_string()))?;

        Ok(page.studies.into_iter().map(RegistryStudy::from).collect())
    }
}

#[async_trait]
impl Registry for CtGovRegistry {
    async fn fetch(&self, nct_id: &str) -> Result<Option<RegistryStudy>, RegistryError> {
        let url = format!("{}/studies/{nct_id}", self.base_url);
        debug!(nct_id, "Registry fetch");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        // Not-found is a normal outcome, never an error
        if status == 404 || status == 400 {
            return Ok(None);
        }
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "Registry returned error");
            return Err(RegistryError::ApiError {
                status_code: status,
                message: body,
            });
        }

        let study: ApiStudy = response
            .json()
            .await
            .map_err(|e| RegistryError::MalformedResponse(e.to_string()))?;

        Ok(Some(study.into()))
    }

    async fn search(
        &self,
        condition: &str,
        location: Option<&str>,
        radius_miles: u32,
        max: usize,
    ) -> Result<Vec<RegistryStudy>, RegistryError> {
        self.search_once(condition, location, radius_miles, max)
            .await
    }

    fn study_url(&self, nct_id: &str) -> String {
        format!("{STUDY_BASE}/{nct_id}")
    }
}

/// Build the query string for a registry-wide search.
///
/// A location that resolves as a postal code becomes a `filter.geo` distance
/// filter carrying the radius; any other location text goes through
/// `query.locn`, where the API applies its own scope.
fn search_query(
    condition: &str,
    location: Option<&str>,
    radius_miles: u32,
    max: usize,
) -> Vec<(&'static str, String)> {
    let mut query: Vec<(&'static str, String)> = vec![
        ("query.cond", condition.to_string()),
        (
            "filter.overallStatus",
            "RECRUITING|NOT_YET_RECRUITING|ACTIVE_NOT_RECRUITING".to_string(),
        ),
        ("pageSize", max.to_string()),
    ];
    if let Some(loc) = location {
        match trialscout_geo::lookup(loc) {
            Some(point) => query.push((
                "filter.geo",
                format!("distance({},{},{radius_miles}mi)", point.lat, point.lon),
            )),
            None => query.push(("query.locn", loc.to_string())),
        }
    }
    query
}

// --- ClinicalTrials.gov v2 wire types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiStudyPage {
    #[serde(default)]
    studies: Vec<ApiStudy>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiStudy {
    protocol_section: ApiProtocolSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiProtocolSection {
    #[serde(default)]
    identification_module: ApiIdentification,
    #[serde(default)]
    status_module: ApiStatus,
    #[serde(default)]
    conditions_module: ApiConditions,
    #[serde(default)]
    eligibility_module: ApiEligibility,
    #[serde(default)]
    arms_interventions_module: ApiArmsInterventions,
    #[serde(default)]
    contacts_locations_module: ApiContactsLocations,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiIdentification {
    #[serde(default)]
    nct_id: String,
    #[serde(default)]
    brief_title: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiStatus {
    #[serde(default)]
    overall_status: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiConditions {
    #[serde(default)]
    conditions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEligibility {
    #[serde(default)]
    minimum_age: Option<String>,
    #[serde(default)]
    maximum_age: Option<String>,
    #[serde(default)]
    sex: Option<String>,
    #[serde(default)]
    eligibility_criteria: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiArmsInterventions {
    #[serde(default)]
    interventions: Vec<ApiIntervention>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiIntervention {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    intervention_type: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiContactsLocations {
    #[serde(default)]
    locations: Vec<ApiLocation>,
}

#[derive(Debug, Deserialize)]
struct ApiLocation {
    #[serde(default)]
    facility: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    status: Option<String>,
}

impl From<ApiStudy> for RegistryStudy {
    fn from(s: ApiStudy) -> Self {
        let p = s.protocol_section;
        RegistryStudy {
            nct_id: p.identification_module.nct_id,
            title: p.identification_module.brief_title,
            overall_status: p.status_module.overall_status,
            conditions: p.conditions_module.conditions,
            minimum_age: p.eligibility_module.minimum_age,
            maximum_age: p.eligibility_module.maximum_age,
            sex: p.eligibility_module.sex,
            eligibility_criteria: p.eligibility_module.eligibility_criteria,
            interventions: p
                .arms_interventions_module
                .interventions
                .into_iter()
                .map(|i| Intervention {
                    name: i.name,
                    intervention_type: i.intervention_type,
                    description: i.description,
                })
                .collect(),
            locations: p
                .contacts_locations_module
                .locations
                .into_iter()
                .map(|l| RegistryLocation {
                    facility: l.facility,
                    city: l.city,
                    state: l.state,
                    status: l.status,
                })
                .collect(),
        }
    }
}
