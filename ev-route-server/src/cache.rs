//! In-memory TTL store.
//!
//! Wraps a moka cache so that every entry carries its own time-to-live. The
//! store is owned by whichever service creates it; there is no process-wide
//! instance, so tests get a fresh store simply by building a new service.
//!
//! Expired entries are never returned by [`TtlCache::get`], even if moka has
//! not evicted them yet.

use std::hash::Hash;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache as MokaCache;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL used by [`TtlCache::insert`].
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_capacity: 1000,
        }
    }
}

/// A cached value together with its own lifetime.
#[derive(Clone)]
struct Entry<V> {
    value: V,
    ttl: Duration,
}

/// Expiry policy reading the TTL stored on each entry.
struct PerEntryTtl;

impl<K, V> Expiry<K, Entry<V>> for PerEntryTtl {
    fn expire_after_create(&self, _key: &K, entry: &Entry<V>, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &K,
        entry: &Entry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // A replaced entry starts a fresh lifetime
        Some(entry.ttl)
    }
}

/// Concurrent key/value store with per-entry expiry.
///
/// Each `set` replaces the previous entry for the key atomically.
pub struct TtlCache<K, V> {
    entries: MokaCache<K, Entry<V>>,
    default_ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let entries = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self {
            entries,
            default_ttl: config.ttl,
        }
    }

    /// Get a live entry.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).await.map(|entry| entry.value)
    }

    /// Store a value that expires after `ttl`.
    pub async fn set(&self, key: K, value: V, ttl: Duration) {
        self.entries.insert(key, Entry { value, ttl }).await;
    }

    /// Store a value with the configured default TTL.
    pub async fn insert(&self, key: K, value: V) {
        self.set(key, value, self.default_ttl).await;
    }

    /// Remove an entry if present.
    pub async fn evict(&self, key: &K) {
        self.entries.invalidate(key).await;
    }

    /// The TTL applied by [`insert`](Self::insert).
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Approximate number of entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> TtlCache<String, u32> {
        TtlCache::new(&CacheConfig::default())
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 1000);
    }

    #[tokio::test]
    async fn set_then_get() {
        let cache = cache();
        cache.set("a".to_string(), 1, Duration::from_secs(60)).await;
        assert_eq!(cache.get(&"a".to_string()).await, Some(1));
        assert_eq!(cache.get(&"b".to_string()).await, None);
    }

    #[tokio::test]
    async fn set_replaces_existing() {
        let cache = cache();
        cache.insert("a".to_string(), 1).await;
        cache.insert("a".to_string(), 2).await;
        assert_eq!(cache.get(&"a".to_string()).await, Some(2));
    }

    #[tokio::test]
    async fn entries_expire_individually() {
        let cache = cache();
        cache.set("short".to_string(), 1, Duration::from_millis(20)).await;
        cache.set("long".to_string(), 2, Duration::from_secs(60)).await;

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(cache.get(&"short".to_string()).await, None);
        assert_eq!(cache.get(&"long".to_string()).await, Some(2));
    }

    #[tokio::test]
    async fn evict_removes_entry() {
        let cache = cache();
        cache.insert("a".to_string(), 1).await;
        cache.evict(&"a".to_string()).await;
        assert_eq!(cache.get(&"a".to_string()).await, None);
    }

    #[tokio::test]
    async fn invalidate_all_clears() {
        let cache = cache();
        cache.insert("a".to_string(), 1).await;
        cache.insert("b".to_string(), 2).await;
        cache.invalidate_all();
        assert_eq!(cache.get(&"a".to_string()).await, None);
        assert_eq!(cache.get(&"b".to_string()).await, None);
    }

    #[test]
    fn new_cache_is_empty() {
        assert_eq!(cache().entry_count(), 0);
    }
}
