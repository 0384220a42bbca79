//! HTTP client for the primary trial search service.
//!
//! Endpoints:
//! - `GET {base}/cancer-types` — the searchable taxonomy
//! - `GET {base}/studies?cancerType={t}&page={n}` — paged search
//! - `GET {base}/studies/{id}` — single trial detail

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use trialscout_core::error::SourceError;
use trialscout_core::source::{CancerType, SearchPage, TrialSource};
use trialscout_core::trial::{TrialRecord, TrialSite};

/// The primary trial search service client.
pub struct HttpTrialSource {
    base_url: String,
    portal_base: String,
    client: reqwest::Client,
}

impl HttpTrialSource {
    /// Create a client against the given API base URL.
    ///
    /// `portal_base` is the patient-facing site used for canonical links
    /// (distinct from the API host).
    pub fn new(base_url: impl Into<String>, portal_base: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            portal_base: portal_base.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        debug!(url, "Trial API request");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(SourceError::NotFound(url.to_string()));
        }
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "Trial API returned error");
            return Err(SourceError::ApiError {
                status_code: status,
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl TrialSource for HttpTrialSource {
    async fn list_cancer_types(&self) -> Result<Vec<CancerType>, SourceError> {
        let url = format!("{}/cancer-types", self.base_url);
        let types: Vec<ApiCancerType> = self.get_json(&url, &[]).await?;
        Ok(types.into_iter().map(CancerType::from).collect())
    }

    async fn search(&self, cancer_type: &str, page: usize) -> Result<SearchPage, SourceError> {
        let url = format!("{}/studies", self.base_url);
        let page_resp: ApiSearchPage = self
            .get_json(
                &url,
                &[
                    ("cancerType", cancer_type.to_string()),
                    ("page", page.to_string()),
                ],
            )
            .await?;

        Ok(SearchPage {
            total_count: page_resp.total_count,
            page: page_resp.page,
            page_count: page_resp.page_count,
            records: page_resp.studies.into_iter().map(TrialRecord::from).collect(),
        })
    }

    async fn get_detail(&self, id: &str) -> Result<TrialRecord, SourceError> {
        let url = format!("{}/studies/{id}", self.base_url);
        let study: ApiStudy = self.get_json(&url, &[]).await?;
        Ok(study.into())
    }

    fn portal_url(&self, id: &str) -> String {
        format!("{}/study/{id}", self.portal_base)
    }
}

// --- Trial API wire types (internal) ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCancerType {
    label: String,
    value: String,
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    display_order: u32,
}

impl From<ApiCancerType> for CancerType {
    fn from(t: ApiCancerType) -> Self {
        CancerType {
            label: t.label,
            query_value: t.value,
            enabled: t.enabled,
            display_order: t.display_order,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSearchPage {
    total_count: usize,
    page: usize,
    page_count: usize,
    #[serde(default)]
    studies: Vec<ApiStudy>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiStudy {
    study_id: String,
    study_name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    nct_id: Option<String>,
    #[serde(default)]
    phases: Vec<String>,
    #[serde(default)]
    cancer_types: Vec<String>,
    #[serde(default)]
    sites: Vec<ApiSite>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSite {
    name: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    phone: Option<String>,
}

impl From<ApiStudy> for TrialRecord {
    fn from(s: ApiStudy) -> Self {
        TrialRecord {
            id: s.study_id,
            name: s.study_name,
            title: s.title,
            nct_id: s.nct_id,
            phases: s.phases,
            cancer_types: s.cancer_types,
            sites: s
                .sites
                .into_iter()
                .map(|site| TrialSite {
                    name: site.name,
                    city: site.city,
                    state: site.state,
                    latitude: site.latitude,
                    longitude: site.longitude,
                    phone: site.phone,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portal_url_builds_from_base() {
        let source = HttpTrialSource::new("https://api.example.org/v1", "https://example.org");
        assert_eq!(
            source.portal_url("BRE-430-001"),
            "https://example.org/study/BRE-430-001"
        );
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let source = HttpTrialSource::new("https://api.example.org/v1/", "https://example.org/");
        assert_eq!(source.base_url, "https://api.example.org/v1");
        assert_eq!(source.portal_url("X-1"), "https://example.org/study/X-1");
    }

    #[test]
    fn parse_search_page() {
        let data = r#"{
            "totalCount": 42,
            "page": 1,
            "pageCount": 3,
            "studies": [{
                "studyId": "BRE-430-001",
                "studyName": "S2206",
                "title": "A Randomized Phase III Trial",
                "nctId": "NCT04379596",
                "phases": ["Phase 3"],
                "cancerTypes": ["Breast"],
                "sites": [{
                    "name": "Vanderbilt-Ingram Cancer Center",
                    "city": "Nashville",
                    "state": "TN",
                    "latitude": 36.1420,
                    "longitude": -86.8027,
                    "phone": "615-555-0100"
                }]
            }]
        }"#;
        let page: ApiSearchPage = serde_json::from_str(data).unwrap();
        assert_eq!(page.total_count, 42);
        let record = TrialRecord::from(
            page.studies.into_iter().next().unwrap(),
        );
        assert_eq!(record.id, "BRE-430-001");
        assert_eq!(record.nct_id.as_deref(), Some("NCT04379596"));
        assert_eq!(record.sites[0].city, "Nashville");
    }

    #[test]
    fn parse_study_with_missing_optionals() {
        let data = r#"{"studyId":"GI-22","studyName":"GI Study"}"#;
        let record = TrialRecord::from(serde_json::from_str::<ApiStudy>(data).unwrap());
        assert_eq!(record.id, "GI-22");
        assert!(record.sites.is_empty());
    }

    #[test]
    fn parse_cancer_types() {
        let data = r#"[
            {"label":"Breast Cancer","value":"Breast","enabled":true,"displayOrder":1},
            {"label":"Myeloma","value":"Myeloma","enabled":false,"displayOrder":9}
        ]"#;
        let types: Vec<ApiCancerType> = serde_json::from_str(data).unwrap();
        let types: Vec<CancerType> = types.into_iter().map(CancerType::from).collect();
        assert_eq!(types.len(), 2);
        assert!(types[0].enabled);
        assert_eq!(types[1].display_order, 9);
    }
}
