//! Shared health verdict cache.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use crate::health::state::HealthRecord;

/// Thread-safe map of cluster id -> latest verdict.
///
/// Cloning shares the same underlying map. Entries are replaced whole, so
/// concurrent refreshes of one endpoint resolve as last-writer-wins and
/// refreshes of different endpoints never contend on a common lock.
#[derive(Debug, Clone, Default)]
pub struct HealthCache {
    inner: Arc<DashMap<String, HealthRecord>>,
}

impl HealthCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy out the record for `cluster_id`, if any.
    pub fn get(&self, cluster_id: &str) -> Option<HealthRecord> {
        self.inner.get(cluster_id).map(|entry| *entry)
    }

    /// The record for `cluster_id` if it is still fresh at `now`.
    pub fn fresh(&self, cluster_id: &str, ttl: Duration, now: Instant) -> Option<HealthRecord> {
        self.get(cluster_id).filter(|record| record.is_fresh(ttl, now))
    }

    /// Replace the record for `cluster_id`.
    pub fn store(&self, cluster_id: &str, record: HealthRecord) {
        self.inner.insert(cluster_id.to_string(), record);
    }

    pub fn remove(&self, cluster_id: &str) {
        self.inner.remove(cluster_id);
    }

    pub fn clear(&self) {
        self.inner.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::state::{HealthSource, HealthState};

    #[tokio::test(start_paused = true)]
    async fn test_store_replaces_entry() {
        let cache = HealthCache::new();
        cache.store("a", HealthRecord::new(HealthState::Healthy, HealthSource::Direct));
        cache.store("a", HealthRecord::new(HealthState::Unhealthy, HealthSource::Direct));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a").unwrap().state, HealthState::Unhealthy);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_entries() {
        let cache = HealthCache::new();
        let shared = cache.clone();
        shared.store("a", HealthRecord::new(HealthState::Healthy, HealthSource::Remote));

        let ttl = Duration::from_secs(10);
        assert!(cache.fresh("a", ttl, Instant::now()).is_some());
        tokio::time::advance(ttl).await;
        assert!(cache.fresh("a", ttl, Instant::now()).is_none());
        assert!(cache.get("a").is_some());

        cache.remove("a");
        assert!(shared.is_empty());
    }
}
