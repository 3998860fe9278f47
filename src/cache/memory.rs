//! In-memory cache implementation using moka
//!
//! Provides a fast, thread-safe in-memory cache. Values are stored as JSON
//! strings so any serializable type fits, each stamped with its store time.
//! Freshness is judged at read time against the caller's `max_age`; moka's
//! time-to-live enforces the retention bound.

use super::CacheLayer;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use moka::future::Cache;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Default maximum cache capacity (number of entries)
const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Default retention for entries (10 minutes)
const DEFAULT_RETENTION: Duration = Duration::from_secs(600);

/// Cache entry wrapper that stores serialized JSON data
/// together with its store time
#[derive(Clone)]
struct CacheEntry {
    /// Store time in unix milliseconds
    stored_at_ms: i64,
    /// JSON-serialized value
    data: Arc<String>,
}

impl CacheEntry {
    fn new<T: Serialize>(value: &T) -> Result<Self> {
        let json = serde_json::to_string(value).context("Failed to serialize cache value")?;
        Ok(Self {
            stored_at_ms: Utc::now().timestamp_millis(),
            data: Arc::new(json),
        })
    }

    fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.data).context("Failed to deserialize cache value")
    }

    /// Time elapsed since the entry was stored
    fn age(&self) -> Duration {
        let elapsed = Utc::now().timestamp_millis() - self.stored_at_ms;
        Duration::from_millis(elapsed.max(0) as u64)
    }
}

/// In-memory cache using moka
pub struct MemoryCache {
    /// The underlying moka cache instance
    cache: Cache<String, CacheEntry>,
    /// How long entries are retained at most
    retention: Duration,
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entry_count", &self.cache.entry_count())
            .field("retention", &self.retention)
            .finish()
    }
}

impl MemoryCache {
    /// Create a new memory cache with default settings
    ///
    /// Default configuration:
    /// - Max capacity: 10,000 entries
    /// - Retention: 10 minutes
    pub fn new() -> Self {
        Self::with_capacity_and_retention(DEFAULT_MAX_CAPACITY, DEFAULT_RETENTION)
    }

    /// Create a new memory cache with custom capacity and retention
    ///
    /// # Arguments
    /// * `max_capacity` - Maximum number of entries the cache can hold
    /// * `retention` - How long entries are retained before eviction
    pub fn with_capacity_and_retention(max_capacity: u64, retention: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(retention)
            .build();

        Self { cache, retention }
    }

    /// Get the retention window for this cache
    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Get the current number of entries in the cache
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheLayer for MemoryCache {
    /// Get a value from cache
    ///
    /// Returns `Ok(Some(value))` when the key exists and the entry is
    /// younger than `max_age`; stale entries count as misses but stay
    /// stored until retention evicts or a write replaces them.
    async fn get<T: DeserializeOwned + Send>(
        &self,
        key: &str,
        max_age: Duration,
    ) -> Result<Option<T>> {
        match self.cache.get(key).await {
            Some(entry) => {
                if entry.age() >= max_age {
                    return Ok(None);
                }
                let value = entry.deserialize()?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Store a value, stamping it with the current time
    ///
    /// If the key already exists it is overwritten, which also resets
    /// its age.
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T) -> Result<()> {
        let entry = CacheEntry::new(value)?;
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    /// Delete a value from cache
    ///
    /// If the key doesn't exist, this is a no-op.
    async fn delete(&self, key: &str) -> Result<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    /// Delete all values matching a glob-style pattern
    ///
    /// Iterates over all keys, so large caches pay for the scan.
    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        // moka's iter() returns (Arc<K>, V)
        let keys_to_delete: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| super::pattern_matches(pattern, key.as_ref()))
            .map(|(key, _)| (*key).clone())
            .collect();

        for key in keys_to_delete {
            self.cache.invalidate(&key).await;
        }

        Ok(())
    }

    /// Clear all cache entries
    async fn clear(&self) -> Result<()> {
        self.cache.invalidate_all();
        // Run pending tasks to ensure invalidation is complete
        self.cache.run_pending_tasks().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRESH: Duration = Duration::from_secs(300);

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();

        cache.set("key1", &"value1".to_string()).await.unwrap();

        let result: Option<String> = cache.get("key1", FRESH).await.unwrap();
        assert_eq!(result, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let cache = MemoryCache::new();

        let result: Option<String> = cache.get("nonexistent", FRESH).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_entry_older_than_max_age_is_a_miss() {
        let cache = MemoryCache::new();
        cache.set("key1", &"value1".to_string()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        let stale: Option<String> = cache.get("key1", Duration::from_millis(10)).await.unwrap();
        assert_eq!(stale, None);

        // A generous window still sees the entry
        let fresh: Option<String> = cache.get("key1", FRESH).await.unwrap();
        assert_eq!(fresh, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_overwrite_resets_entry_age() {
        let cache = MemoryCache::new();
        cache.set("key1", &"old".to_string()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        cache.set("key1", &"new".to_string()).await.unwrap();

        let result: Option<String> = cache.get("key1", Duration::from_millis(20)).await.unwrap();
        assert_eq!(result, Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_retention_evicts_entries() {
        let cache = MemoryCache::with_capacity_and_retention(1000, Duration::from_millis(10));
        cache.set("key1", &"value1".to_string()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        cache.cache.run_pending_tasks().await;

        let result: Option<String> = cache.get("key1", FRESH).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = MemoryCache::new();

        cache.set("key1", &"value1".to_string()).await.unwrap();
        cache.delete("key1").await.unwrap();

        let result: Option<String> = cache.get("key1", FRESH).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_delete_pattern_star() {
        let cache = MemoryCache::new();

        cache.set("categories:list:page=1", &"a".to_string()).await.unwrap();
        cache.set("categories:id:cat-1", &"b".to_string()).await.unwrap();
        cache.set("publications:id:pub-1", &"c".to_string()).await.unwrap();

        cache.delete_pattern("categories:*").await.unwrap();

        let list: Option<String> = cache.get("categories:list:page=1", FRESH).await.unwrap();
        let by_id: Option<String> = cache.get("categories:id:cat-1", FRESH).await.unwrap();
        let other: Option<String> = cache.get("publications:id:pub-1", FRESH).await.unwrap();

        assert_eq!(list, None);
        assert_eq!(by_id, None);
        assert_eq!(other, Some("c".to_string()));
    }

    #[tokio::test]
    async fn test_delete_pattern_question_mark() {
        let cache = MemoryCache::new();

        cache.set("page:1", &"one".to_string()).await.unwrap();
        cache.set("page:2", &"two".to_string()).await.unwrap();
        cache.set("page:10", &"ten".to_string()).await.unwrap();

        cache.delete_pattern("page:?").await.unwrap();

        let one: Option<String> = cache.get("page:1", FRESH).await.unwrap();
        let two: Option<String> = cache.get("page:2", FRESH).await.unwrap();
        let ten: Option<String> = cache.get("page:10", FRESH).await.unwrap();

        assert_eq!(one, None);
        assert_eq!(two, None);
        // "10" has two characters, so it shouldn't match "?"
        assert_eq!(ten, Some("ten".to_string()));
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = MemoryCache::new();

        cache.set("key1", &"value1".to_string()).await.unwrap();
        cache.set("key2", &"value2".to_string()).await.unwrap();

        cache.clear().await.unwrap();

        let result1: Option<String> = cache.get("key1", FRESH).await.unwrap();
        let result2: Option<String> = cache.get("key2", FRESH).await.unwrap();

        assert_eq!(result1, None);
        assert_eq!(result2, None);
    }

    #[tokio::test]
    async fn test_complex_types() {
        let cache = MemoryCache::new();

        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Row {
            id: String,
            name: String,
        }

        let row = Row {
            id: "cat-1".to_string(),
            name: "News".to_string(),
        };

        cache.set("categories:id:cat-1", &row).await.unwrap();

        let result: Option<Row> = cache.get("categories:id:cat-1", FRESH).await.unwrap();
        assert_eq!(result, Some(row));
    }

    #[tokio::test]
    async fn test_entry_count() {
        let cache = MemoryCache::new();

        assert_eq!(cache.entry_count(), 0);

        cache.set("key1", &"value1".to_string()).await.unwrap();
        // Run pending tasks to ensure the entry is counted
        cache.cache.run_pending_tasks().await;
        assert_eq!(cache.entry_count(), 1);

        cache.set("key2", &"value2".to_string()).await.unwrap();
        cache.cache.run_pending_tasks().await;
        assert_eq!(cache.entry_count(), 2);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(20))]

            /// Any value that was just stored must be readable while the
            /// freshness window is open.
            #[test]
            fn prop_fresh_entries_round_trip(
                key in "[a-z]{1,10}",
                value in "[a-z]{1,100}"
            ) {
                let rt = tokio::runtime::Runtime::new().unwrap();
                rt.block_on(async {
                    let cache = MemoryCache::new();

                    cache.set(&key, &value).await.unwrap();

                    let result: Option<String> = cache.get(&key, FRESH).await.unwrap();
                    prop_assert_eq!(result, Some(value));
                    Ok(())
                })?;
            }

            /// A zero freshness window turns every read into a miss, while
            /// the stored entry itself survives for later generous reads.
            #[test]
            fn prop_zero_max_age_always_misses(
                key in "[a-z]{1,10}",
                value in "[a-z]{1,100}"
            ) {
                let rt = tokio::runtime::Runtime::new().unwrap();
                rt.block_on(async {
                    let cache = MemoryCache::new();

                    cache.set(&key, &value).await.unwrap();

                    let miss: Option<String> = cache.get(&key, Duration::ZERO).await.unwrap();
                    prop_assert_eq!(miss, None);

                    let hit: Option<String> = cache.get(&key, FRESH).await.unwrap();
                    prop_assert_eq!(hit, Some(value));
                    Ok(())
                })?;
            }
        }
    }
}
