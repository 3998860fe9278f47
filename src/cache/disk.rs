//! File-backed cache implementation
//!
//! Persists entries as one JSON file per key under a cache directory, so a
//! short-lived invocation can observe freshness windows left by earlier
//! runs. Each file records its key and store time; entries past the
//! retention window are removed when touched.
//!
//! File names are a sanitized form of the key plus a hash suffix. The key
//! stored inside the file is authoritative, the name is only for listing.

use super::CacheLayer;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default retention for entries (10 minutes)
const DEFAULT_RETENTION: Duration = Duration::from_secs(600);

/// On-disk entry wrapper
#[derive(Debug, Serialize, Deserialize)]
struct DiskEntry {
    /// Original cache key
    key: String,
    /// Store time in unix milliseconds
    stored_at_ms: i64,
    /// JSON-serialized value
    data: String,
}

impl DiskEntry {
    fn new<T: Serialize>(key: &str, value: &T) -> Result<Self> {
        let json = serde_json::to_string(value).context("Failed to serialize cache value")?;
        Ok(Self {
            key: key.to_string(),
            stored_at_ms: Utc::now().timestamp_millis(),
            data: json,
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

/// File-backed cache storing one JSON file per key
#[derive(Debug)]
pub struct DiskCache {
    dir: PathBuf,
    retention: Duration,
}

impl DiskCache {
    /// Create a disk cache with the default retention
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_retention(dir, DEFAULT_RETENTION)
    }

    /// Create a disk cache with custom retention
    pub fn with_retention(dir: impl Into<PathBuf>, retention: Duration) -> Self {
        Self {
            dir: dir.into(),
            retention,
        }
    }

    /// Get the retention window for this cache
    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// File path for a key: sanitized key plus a hash suffix
    fn entry_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        self.dir.join(format!("{}-{:016x}.json", safe, hasher.finish()))
    }

    async fn read_entry(&self, path: &Path) -> Result<Option<DiskEntry>> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).context("Failed to read cache file"),
        };
        let entry = serde_json::from_slice(&bytes).context("Failed to parse cache file")?;
        Ok(Some(entry))
    }

    async fn remove_file(path: &Path) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to remove cache file"),
        }
    }

    /// List entry files currently in the cache directory
    async fn entry_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(files),
            Err(e) => return Err(e).context("Failed to read cache directory"),
        };
        while let Some(item) = dir
            .next_entry()
            .await
            .context("Failed to read cache directory")?
        {
            let path = item.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

#[async_trait]
impl CacheLayer for DiskCache {
    /// Get a value from cache
    ///
    /// Entries past retention are deleted on sight. Entries older than
    /// `max_age` are reported as misses but left in place.
    async fn get<T: DeserializeOwned + Send>(
        &self,
        key: &str,
        max_age: Duration,
    ) -> Result<Option<T>> {
        let path = self.entry_path(key);
        let entry = match self.read_entry(&path).await? {
            // The stored key is checked in case of a file-name collision
            Some(entry) if entry.key == key => entry,
            _ => return Ok(None),
        };

        let age = entry.age();
        if age >= self.retention {
            Self::remove_file(&path).await?;
            return Ok(None);
        }
        if age >= max_age {
            return Ok(None);
        }
        entry.deserialize().map(Some)
    }

    /// Store a value, stamping it with the current time
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T) -> Result<()> {
        let entry = DiskEntry::new(key, value)?;
        let bytes = serde_json::to_vec(&entry).context("Failed to serialize cache entry")?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .context("Failed to create cache directory")?;
        tokio::fs::write(self.entry_path(key), bytes)
            .await
            .context("Failed to write cache file")?;
        Ok(())
    }

    /// Delete a value from cache
    async fn delete(&self, key: &str) -> Result<()> {
        Self::remove_file(&self.entry_path(key)).await
    }

    /// Delete all values whose stored key matches a glob pattern
    ///
    /// Unreadable entry files are removed as well.
    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        for path in self.entry_files().await? {
            match self.read_entry(&path).await {
                Ok(Some(entry)) if super::pattern_matches(pattern, &entry.key) => {
                    Self::remove_file(&path).await?;
                }
                Ok(_) => {}
                Err(_) => {
                    Self::remove_file(&path).await?;
                }
            }
        }
        Ok(())
    }

    /// Clear all cache entries
    async fn clear(&self) -> Result<()> {
        for path in self.entry_files().await? {
            Self::remove_file(&path).await?;
        }
        Ok(())
    }
}
