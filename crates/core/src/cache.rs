//! Trial cache — avoid refetching a trial already seen in this conversation.
//!
//! Every search inserts one entry per record under two aliases: the raw
//! internal id and the uppercased display name. Lookups tolerate partial
//! matches: exact id first, then case-normalized exact, then substring
//! containment either direction ("BRE-430" resolves an entry cached as
//! "BRE-430-001"). First hit wins.
//!
//! No eviction beyond the conversation/process lifetime — per-conversation
//! cardinality is tens of entries.

use crate::trial::TrialRecord;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// A cached trial record plus the origin ZIP used at fetch time.
///
/// The ZIP is kept so later detail lookups can recompute distance-qualified
/// summaries without re-supplying the origin.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub record: TrialRecord,
    pub origin_zip: Option<String>,
}

/// In-memory associative store keyed by multiple aliases per trial.
pub struct TrialCache {
    entries: RwLock<HashMap<String, Arc<CacheEntry>>>,
}

impl TrialCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Insert entries for a batch of records. Later writes with the same
    /// alias overwrite.
    pub async fn put(&self, records: &[TrialRecord], origin_zip: Option<&str>) {
        let mut entries = self.entries.write().await;
        for record in records {
            let entry = Arc::new(CacheEntry {
                record: record.clone(),
                origin_zip: origin_zip.map(String::from),
            });
            entries.insert(record.id.clone(), Arc::clone(&entry));
            entries.insert(record.name.to_uppercase(), entry);
        }
        debug!(count = records.len(), total = entries.len(), "Cached trial records");
    }

    /// Resolve an alias: exact → case-normalized exact → substring
    /// containment either direction. First hit wins; no hit returns `None`.
    pub async fn get(&self, key: &str) -> Option<Arc<CacheEntry>> {
        let entries = self.entries.read().await;

        if let Some(entry) = entries.get(key) {
            return Some(Arc::clone(entry));
        }

        let upper = key.to_uppercase();
        if let Some(entry) = entries.get(&upper) {
            return Some(Arc::clone(entry));
        }

        entries
            .iter()
            .find(|(stored, _)| {
                let stored_upper = stored.to_uppercase();
                stored_upper.contains(&upper) || upper.contains(&stored_upper)
            })
            .map(|(_, entry)| Arc::clone(entry))
    }

    /// Number of aliases currently stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for TrialCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> TrialRecord {
        TrialRecord {
            id: id.into(),
            name: name.into(),
            title: format!("Title for {name}"),
            nct_id: None,
            phases: vec![],
            cancer_types: vec![],
            sites: vec![],
        }
    }

    #[tokio::test]
    async fn get_by_id_and_uppercased_name() {
        let cache = TrialCache::new();
        cache
            .put(&[record("BRE-430-001", "S2206 Breast Study")], Some("37203"))
            .await;

        let by_id = cache.get("BRE-430-001").await.unwrap();
        let by_name = cache.get("S2206 BREAST STUDY").await.unwrap();
        assert_eq!(by_id.record.id, by_name.record.id);
        assert_eq!(by_id.origin_zip.as_deref(), Some("37203"));
    }

    #[tokio::test]
    async fn get_is_case_insensitive() {
        let cache = TrialCache::new();
        cache.put(&[record("LUN-88", "Lung Study")], None).await;

        assert!(cache.get("lung study").await.is_some());
        assert!(cache.get("lun-88").await.is_some());
    }

    #[tokio::test]
    async fn substring_matches_either_direction() {
        let cache = TrialCache::new();
        cache.put(&[record("BRE-430-001", "S2206")], None).await;

        // Query is a prefix of the stored key
        assert!(cache.get("BRE-430").await.is_some());
        // Stored key is contained in the query
        assert!(cache.get("study BRE-430-001 details").await.is_some());
    }

    #[tokio::test]
    async fn miss_returns_none() {
        let cache = TrialCache::new();
        cache.put(&[record("BRE-1", "Alpha")], None).await;
        assert!(cache.get("XYZ-999").await.is_none());
    }

    #[tokio::test]
    async fn later_writes_overwrite_same_alias() {
        let cache = TrialCache::new();
        cache.put(&[record("BRE-1", "Alpha")], Some("10001")).await;
        cache.put(&[record("BRE-1", "Alpha")], Some("37203")).await;

        let entry = cache.get("BRE-1").await.unwrap();
        assert_eq!(entry.origin_zip.as_deref(), Some("37203"));
        // Two aliases (id + name), not four
        assert_eq!(cache.len().await, 2);
    }
}
