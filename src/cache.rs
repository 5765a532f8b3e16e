//! In-memory TTL cache for search responses.
//!
//! Entries are keyed by a deterministic fingerprint of the request
//! parameters so that identical requests hit the same slot regardless of the
//! order the parameters arrived in. Expired entries are treated as misses
//! and overwritten on the next store; they are never proactively purged, and
//! the map carries no capacity bound - growth over the process lifetime is
//! an accepted characteristic of this cache.

use crate::event::SearchParams;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Compute the fingerprint of a request's parameters.
///
/// SHA-256 over the canonical JSON of the sorted key-value pairs. Two
/// parameter maps with the same entries produce the same fingerprint no
/// matter their insertion order.
#[must_use]
pub fn fingerprint(params: &SearchParams) -> String {
    // BTreeMap iteration is already sorted by key; serialize pairs as a
    // stable array to keep the digest canonical.
    let pairs: Vec<(&String, &Value)> = params.iter().collect();
    let canonical = serde_json::to_string(&pairs).unwrap_or_default();

    let digest = Sha256::digest(canonical.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// A cached value with its storage time
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() >= ttl
    }
}

/// Hit/miss counters for observability
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Hit rate as a percentage
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

#[derive(Debug)]
struct CacheState<T> {
    entries: HashMap<String, CacheEntry<T>>,
    stats: CacheStats,
}

/// Process-lifetime response cache shared across invocations.
///
/// Guarded with an async `RwLock`: the hosting runtime may interleave
/// requests, so lookups and stores are individually atomic. Get-or-compute
/// is not atomic per fingerprint - two identical in-flight requests may both
/// reach the provider.
#[derive(Debug)]
pub struct ResponseCache<T> {
    state: RwLock<CacheState<T>>,
    ttl: Duration,
}

impl<T: Clone> ResponseCache<T> {
    /// Create a cache whose entries stay fresh for `ttl`
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: RwLock::new(CacheState {
                entries: HashMap::new(),
                stats: CacheStats::default(),
            }),
            ttl,
        }
    }

    /// Look up a fresh entry by fingerprint.
    ///
    /// Returns `None` for absent and expired entries alike; expired entries
    /// stay in the map until the next store overwrites them.
    pub async fn lookup(&self, key: &str) -> Option<T> {
        let mut state = self.state.write().await;

        let fresh = state
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(self.ttl))
            .map(|entry| entry.value.clone());

        if fresh.is_some() {
            state.stats.hits += 1;
            debug!(fingerprint = key, "cache hit");
        } else {
            state.stats.misses += 1;
        }

        fresh
    }

    /// Store a value, replacing any previous entry for this fingerprint
    pub async fn store(&self, key: &str, value: T) {
        let mut state = self.state.write().await;
        state.entries.insert(key.to_string(), CacheEntry::new(value));
    }

    /// Number of entries currently held, expired ones included
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    /// Whether the cache holds no entries at all
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    /// Snapshot of the hit/miss counters
    pub async fn stats(&self) -> CacheStats {
        self.state.read().await.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params_from(pairs: &[(&str, Value)]) -> SearchParams {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn fingerprint_is_order_independent() {
        let a = params_from(&[
            ("query", json!("rust")),
            ("max_results", json!("3")),
            ("topic", json!("news")),
        ]);
        let b = params_from(&[
            ("topic", json!("news")),
            ("query", json!("rust")),
            ("max_results", json!("3")),
        ]);
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn fingerprint_differs_on_values() {
        let a = params_from(&[("query", json!("rust"))]);
        let b = params_from(&[("query", json!("go"))]);
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[tokio::test]
    async fn store_then_lookup() {
        let cache = ResponseCache::new(Duration::from_secs(300));
        cache.store("k", "value".to_string()).await;
        assert_eq!(cache.lookup("k").await.as_deref(), Some("value"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn expired_entry_is_a_miss_but_not_removed() {
        let cache = ResponseCache::new(Duration::from_millis(10));
        cache.store("k", 1u32).await;
        tokio::time::sleep(Duration::from_millis(25)).await;

        assert!(cache.lookup("k").await.is_none());
        // Stale entry lingers until overwritten.
        assert_eq!(cache.len().await, 1);

        cache.store("k", 2u32).await;
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn stats_track_hits_and_misses() {
        let cache = ResponseCache::new(Duration::from_secs(300));
        assert!(cache.lookup("absent").await.is_none());
        cache.store("k", ()).await;
        cache.lookup("k").await;

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 50.0).abs() < f64::EPSILON);
    }
}
