//! Guestbook service
//!
//! Implements business logic for guestbook moderation:
//! - Paginated entry listing with search and sorting
//! - Entry inspection by ID
//! - Entry removal
//!
//! Entries are created by visitors on the public site, so this service has no
//! create or update path. Reads go through the cache first; deleting an entry
//! invalidates every cached guestbook entry.

use crate::api::{ApiClient, ApiError};
use crate::cache::{Cache, CacheLayer};
use crate::models::{GuestBookEntry, ListQuery, Page};
use std::sync::Arc;
use std::time::Duration;

/// Default age after which cached guestbook data is refetched (5 minutes)
const GUESTBOOK_STALE_SECS: u64 = 300;

/// Cache key prefixes
const CACHE_KEY_GUESTBOOK_LIST: &str = "guestbook:list:";
const CACHE_KEY_GUESTBOOK_BY_ID: &str = "guestbook:id:";
const CACHE_PATTERN_GUESTBOOK: &str = "guestbook:*";

/// Error types for guestbook service operations
#[derive(Debug, thiserror::Error)]
pub enum GuestBookServiceError {
    /// The backend rejected the request
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Guestbook service backed by the admin API
pub struct GuestBookService {
    api: Arc<ApiClient>,
    cache: Arc<Cache>,
    stale_after: Duration,
}

impl GuestBookService {
    /// Create a new guestbook service
    pub fn new(api: Arc<ApiClient>, cache: Arc<Cache>) -> Self {
        Self {
            api,
            cache,
            stale_after: Duration::from_secs(GUESTBOOK_STALE_SECS),
        }
    }

    /// Create a new guestbook service with a custom staleness window
    pub fn with_stale_after(api: Arc<ApiClient>, cache: Arc<Cache>, stale_after: Duration) -> Self {
        Self {
            api,
            cache,
            stale_after,
        }
    }

    /// List guestbook entries with pagination
    ///
    /// # Arguments
    /// * `query` - Page, limit, search, and sort parameters
    ///
    /// # Returns
    /// One page of entries with pagination metadata
    pub async fn list(&self, query: &ListQuery) -> Result<Page<GuestBookEntry>, GuestBookServiceError> {
        // Try cache first
        let cache_key = format!("{}{}", CACHE_KEY_GUESTBOOK_LIST, query.cache_key());
        if let Some(page) = self
            .cache
            .get::<Page<GuestBookEntry>>(&cache_key, self.stale_after)
            .await
            .ok()
            .flatten()
        {
            return Ok(page);
        }

        // Fetch from the backend
        let page = self.api.list_guestbook(query).await?;

        // Cache the result
        let _ = self.cache.set(&cache_key, &page).await;

        Ok(page)
    }

    /// Get guestbook entry by ID
    ///
    /// # Arguments
    /// * `id` - Entry ID
    pub async fn get_by_id(&self, id: &str) -> Result<GuestBookEntry, GuestBookServiceError> {
        // Try cache first
        let cache_key = format!("{}{}", CACHE_KEY_GUESTBOOK_BY_ID, id);
        if let Some(entry) = self
            .cache
            .get::<GuestBookEntry>(&cache_key, self.stale_after)
            .await
            .ok()
            .flatten()
        {
            return Ok(entry);
        }

        // Fetch from the backend
        let entry = self.api.get_guestbook_entry(id).await?;

        // Cache the result
        let _ = self.cache.set(&cache_key, &entry).await;

        Ok(entry)
    }

    /// Delete a guestbook entry
    ///
    /// # Arguments
    /// * `id` - Entry ID to delete
    pub async fn delete(&self, id: &str) -> Result<(), GuestBookServiceError> {
        // Delete the entry on the backend
        self.api.delete_guestbook_entry(id).await?;

        // Invalidate cache
        self.invalidate_cache().await?;

        Ok(())
    }

    // ========================================================================
    // Private helper methods
    // ========================================================================

    /// Invalidate all guestbook-related cache entries
    async fn invalidate_cache(&self) -> Result<(), GuestBookServiceError> {
        let _ = self.cache.delete_pattern(CACHE_PATTERN_GUESTBOOK).await;
        Ok(())
    }
}
