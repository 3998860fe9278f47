//! Cache layer
//!
//! This module provides the query-cache abstraction for the pressroom
//! console. It supports:
//! - In-memory cache (moka) - default, for a single long-lived process
//! - Disk cache - persists entries as JSON files so short-lived invocations
//!   can observe freshness windows across runs
//!
//! Entries are stamped with their store time. Reads pass a `max_age`: an
//! entry older than that is reported as a miss, so callers decide how much
//! staleness they tolerate. Retention is fixed per cache instance and bounds
//! how long an entry can live at all.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pressroom::cache::{create_cache, CacheLayer};
//! use pressroom::config::CacheConfig;
//!
//! let config = CacheConfig::default();
//! let cache = create_cache(&config).await?;
//! cache.set("key", &"value").await?;
//! let hit: Option<String> = cache.get("key", Duration::from_secs(300)).await?;
//! ```

pub mod disk;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{CacheConfig, CacheDriver};

pub use disk::DiskCache;
pub use memory::MemoryCache;

/// Default bound on how many entries the in-memory cache holds
const MEMORY_MAX_CAPACITY: u64 = 10_000;

/// Cache layer trait
///
/// This trait defines the interface for cache implementations.
/// Note: Due to Rust's object safety rules, this trait cannot be used
/// as a trait object (`dyn CacheLayer`). Use the `Cache` enum instead
/// for runtime polymorphism.
#[async_trait]
pub trait CacheLayer: Send + Sync {
    /// Get a value from cache, treating entries older than `max_age` as misses
    async fn get<T: DeserializeOwned + Send>(&self, key: &str, max_age: Duration)
        -> Result<Option<T>>;

    /// Store a value, stamping it with the current time
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T) -> Result<()>;

    /// Delete a value from cache
    async fn delete(&self, key: &str) -> Result<()>;

    /// Delete all values whose key matches a glob pattern
    async fn delete_pattern(&self, pattern: &str) -> Result<()>;

    /// Clear all cache entries
    async fn clear(&self) -> Result<()>;
}

/// Unified cache enum for runtime polymorphism
///
/// Since `CacheLayer` has generic methods, it cannot be used as a trait
/// object. This enum wraps the concrete implementations instead.
#[derive(Debug)]
pub enum Cache {
    /// In-memory cache using moka
    Memory(MemoryCache),
    /// File-backed cache
    Disk(DiskCache),
}

#[async_trait]
impl CacheLayer for Cache {
    async fn get<T: DeserializeOwned + Send>(
        &self,
        key: &str,
        max_age: Duration,
    ) -> Result<Option<T>> {
        match self {
            Cache::Memory(cache) => cache.get(key, max_age).await,
            Cache::Disk(cache) => cache.get(key, max_age).await,
        }
    }

    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T) -> Result<()> {
        match self {
            Cache::Memory(cache) => cache.set(key, value).await,
            Cache::Disk(cache) => cache.set(key, value).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match self {
            Cache::Memory(cache) => cache.delete(key).await,
            Cache::Disk(cache) => cache.delete(key).await,
        }
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        match self {
            Cache::Memory(cache) => cache.delete_pattern(pattern).await,
            Cache::Disk(cache) => cache.delete_pattern(pattern).await,
        }
    }

    async fn clear(&self) -> Result<()> {
        match self {
            Cache::Memory(cache) => cache.clear().await,
            Cache::Disk(cache) => cache.clear().await,
        }
    }
}

/// Create a cache instance based on configuration
///
/// - `CacheDriver::Memory` - in-memory cache using moka
/// - `CacheDriver::Disk` - JSON files under `config.dir`, created on demand
///
/// Retention comes from `config.retain_secs` and applies to both drivers.
pub async fn create_cache(config: &CacheConfig) -> Result<Arc<Cache>> {
    let retention = Duration::from_secs(config.retain_secs);

    match config.driver {
        CacheDriver::Memory => {
            let cache = MemoryCache::with_capacity_and_retention(MEMORY_MAX_CAPACITY, retention);
            Ok(Arc::new(Cache::Memory(cache)))
        }
        CacheDriver::Disk => {
            tokio::fs::create_dir_all(&config.dir).await.map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create cache directory {}: {}",
                    config.dir.display(),
                    e
                )
            })?;
            let cache = DiskCache::with_retention(&config.dir, retention);
            Ok(Arc::new(Cache::Disk(cache)))
        }
    }
}

/// Check if a key matches a glob pattern
///
/// Supports `*` (any sequence) and `?` (any single character).
pub(crate) fn pattern_matches(pattern: &str, key: &str) -> bool {
    glob_match(
        &pattern.chars().collect::<Vec<_>>(),
        &key.chars().collect::<Vec<_>>(),
    )
}

fn glob_match(pattern: &[char], key: &[char]) -> bool {
    match pattern.split_first() {
        None => key.is_empty(),
        Some((&'*', rest)) => {
            // `*` matches zero characters, or one more and tries again
            glob_match(rest, key)
                || key
                    .split_first()
                    .map_or(false, |(_, key_rest)| glob_match(pattern, key_rest))
        }
        Some((&'?', rest)) => key
            .split_first()
            .map_or(false, |(_, key_rest)| glob_match(rest, key_rest)),
        Some((c, rest)) => key
            .split_first()
            .map_or(false, |(k, key_rest)| k == c && glob_match(rest, key_rest)),
    }
}
