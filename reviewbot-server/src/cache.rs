use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Time-bounded record of pull requests the webhook has already reviewed.
///
/// Repeated webhook deliveries for the same PR within the TTL are dropped;
/// entries older than the TTL are evicted on access, so the map cannot grow
/// without bound.
#[derive(Clone)]
pub struct ProcessedCache {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<i64, Instant>>>,
}

impl ProcessedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Record `pr_id` as processed. Returns `false` if it was already
    /// recorded within the TTL (a duplicate delivery).
    pub async fn mark(&self, pr_id: i64) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        entries.retain(|_, seen_at| now.duration_since(*seen_at) < self.ttl);

        match entries.get(&pr_id) {
            Some(_) => false,
            None => {
                entries.insert(pr_id, now);
                true
            }
        }
    }
}
