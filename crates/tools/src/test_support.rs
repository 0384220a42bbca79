//! Shared mock collaborators for tool handler tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use trialscout_core::error::{RegistryError, SourceError};
use trialscout_core::source::{CancerType, Registry, RegistryStudy, SearchPage, TrialSource};
use trialscout_core::trial::{TrialRecord, TrialSite};

pub fn nashville_site(name: &str) -> TrialSite {
    TrialSite {
        name: name.into(),
        city: "Nashville".into(),
        state: "TN".into(),
        latitude: Some(36.1420),
        longitude: Some(-86.8027),
        phone: Some("615-555-0100".into()),
    }
}

pub fn chicago_site(name: &str) -> TrialSite {
    TrialSite {
        name: name.into(),
        city: "Chicago".into(),
        state: "IL".into(),
        latitude: Some(41.8853),
        longitude: Some(-87.6216),
        phone: None,
    }
}

pub fn record(id: &str, name: &str, sites: Vec<TrialSite>) -> TrialRecord {
    TrialRecord {
        id: id.into(),
        name: name.into(),
        title: format!("Full title of {name}"),
        nct_id: Some("NCT04379596".into()),
        phases: vec!["Phase 2".into()],
        cancer_types: vec!["Breast".into()],
        sites,
    }
}

/// A trial source serving canned records, with call counting.
#[derive(Default)]
pub struct MockTrialSource {
    pub records: Vec<TrialRecord>,
    pub cancer_types: Vec<CancerType>,
    pub search_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub fail_search: bool,
}

#[async_trait]
impl TrialSource for MockTrialSource {
    async fn list_cancer_types(&self) -> Result<Vec<CancerType>, SourceError> {
        Ok(self.cancer_types.clone())
    }

    async fn search(&self, _cancer_type: &str, page: usize) -> Result<SearchPage, SourceError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_search {
            return Err(SourceError::ApiError {
                status_code: 503,
                message: "upstream unavailable".into(),
            });
        }
        Ok(SearchPage {
            total_count: self.records.len(),
            page,
            page_count: 1,
            records: self.records.clone(),
        })
    }

    async fn get_detail(&self, id: &str) -> Result<TrialRecord, SourceError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }

    fn portal_url(&self, id: &str) -> String {
        format!("https://portal.test/study/{id}")
    }
}

/// A registry serving canned studies, optionally rejecting the first
/// location-filtered search.
#[derive(Default)]
pub struct MockRegistry {
    pub studies: Vec<RegistryStudy>,
    pub reject_location_filter: bool,
    pub search_locations_seen: Mutex<Vec<Option<String>>>,
    pub search_radii_seen: Mutex<Vec<u32>>,
}

#[async_trait]
impl Registry for MockRegistry {
    async fn fetch(&self, nct_id: &str) -> Result<Option<RegistryStudy>, RegistryError> {
        Ok(self.studies.iter().find(|s| s.nct_id == nct_id).cloned())
    }

    async fn search(
        &self,
        _condition: &str,
        location: Option<&str>,
        radius_miles: u32,
        max: usize,
    ) -> Result<Vec<RegistryStudy>, RegistryError> {
        self.search_locations_seen
            .lock()
            .unwrap()
            .push(location.map(String::from));
        self.search_radii_seen.lock().unwrap().push(radius_miles);
        if self.reject_location_filter && location.is_some() {
            return Err(RegistryError::FilterRejected("bad location".into()));
        }
        Ok(self.studies.iter().take(max).cloned().collect())
    }

    fn study_url(&self, nct_id: &str) -> String {
        format!("https://clinicaltrials.gov/study/{nct_id}")
    }
}
