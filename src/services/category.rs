//! Category service
//!
//! Implements business logic for article category management:
//! - Paginated category listing with search and sorting
//! - Full category listing for publication pickers
//! - Create, read, update, delete categories
//! - Input validation before any request is sent
//!
//! Reads go through the cache first and fall back to the backend; mutations
//! invalidate every cached category entry so the next read is fresh.

use crate::api::{ApiClient, ApiError};
use crate::cache::{Cache, CacheLayer};
use crate::models::{ArticleCategory, CreateCategoryInput, ListQuery, Page, UpdateCategoryInput};
use std::sync::Arc;
use std::time::Duration;

/// Default age after which cached category data is refetched (5 minutes)
const CATEGORY_STALE_SECS: u64 = 300;

/// Cache key prefixes
const CACHE_KEY_CATEGORY_LIST: &str = "categories:list:";
const CACHE_KEY_CATEGORY_BY_ID: &str = "categories:id:";
const CACHE_KEY_CATEGORY_ALL: &str = "categories:all";
const CACHE_PATTERN_CATEGORIES: &str = "categories:*";

/// Error types for category service operations
#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    /// Input failed validation before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backend rejected the request
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Category service backed by the admin API
pub struct CategoryService {
    api: Arc<ApiClient>,
    cache: Arc<Cache>,
    stale_after: Duration,
}

impl CategoryService {
    /// Create a new category service
    pub fn new(api: Arc<ApiClient>, cache: Arc<Cache>) -> Self {
        Self {
            api,
            cache,
            stale_after: Duration::from_secs(CATEGORY_STALE_SECS),
        }
    }

    /// Create a new category service with a custom staleness window
    pub fn with_stale_after(api: Arc<ApiClient>, cache: Arc<Cache>, stale_after: Duration) -> Self {
        Self {
            api,
            cache,
            stale_after,
        }
    }

    /// List categories with pagination
    ///
    /// # Arguments
    /// * `query` - Page, limit, search, and sort parameters
    ///
    /// # Returns
    /// One page of categories with pagination metadata
    pub async fn list(&self, query: &ListQuery) -> Result<Page<ArticleCategory>, CategoryServiceError> {
        // Try cache first
        let cache_key = format!("{}{}", CACHE_KEY_CATEGORY_LIST, query.cache_key());
        if let Some(page) = self
            .cache
            .get::<Page<ArticleCategory>>(&cache_key, self.stale_after)
            .await
            .ok()
            .flatten()
        {
            return Ok(page);
        }

        // Fetch from the backend
        let page = self.api.list_categories(query).await?;

        // Cache the result
        let _ = self.cache.set(&cache_key, &page).await;

        Ok(page)
    }

    /// List every category without pagination
    ///
    /// Used to populate the category picker when editing publications.
    pub async fn list_all(&self) -> Result<Vec<ArticleCategory>, CategoryServiceError> {
        // Try cache first
        if let Some(categories) = self
            .cache
            .get::<Vec<ArticleCategory>>(CACHE_KEY_CATEGORY_ALL, self.stale_after)
            .await
            .ok()
            .flatten()
        {
            return Ok(categories);
        }

        // Fetch from the backend
        let categories = self.api.list_all_categories().await?;

        // Cache the result
        let _ = self.cache.set(CACHE_KEY_CATEGORY_ALL, &categories).await;

        Ok(categories)
    }

    /// Get category by ID
    ///
    /// # Arguments
    /// * `id` - Category ID
    pub async fn get_by_id(&self, id: &str) -> Result<ArticleCategory, CategoryServiceError> {
        // Try cache first
        let cache_key = format!("{}{}", CACHE_KEY_CATEGORY_BY_ID, id);
        if let Some(category) = self
            .cache
            .get::<ArticleCategory>(&cache_key, self.stale_after)
            .await
            .ok()
            .flatten()
        {
            return Ok(category);
        }

        // Fetch from the backend
        let category = self.api.get_category(id).await?;

        // Cache the result
        let _ = self.cache.set(&cache_key, &category).await;

        Ok(category)
    }

    /// Create a new category
    ///
    /// # Arguments
    /// * `input` - Category creation input
    ///
    /// # Returns
    /// The created category
    ///
    /// # Errors
    /// - `Validation` if the name is empty after trimming
    /// - `Api` if the backend rejects the request
    pub async fn create(
        &self,
        input: CreateCategoryInput,
    ) -> Result<ArticleCategory, CategoryServiceError> {
        // Validate input
        self.validate_create_input(&input)?;

        // Create the category on the backend
        let category = self.api.create_category(&input).await?;

        // Invalidate cache
        self.invalidate_cache().await?;

        Ok(category)
    }

    /// Update a category
    ///
    /// # Arguments
    /// * `id` - Category ID to update
    /// * `input` - Update input, only set fields are sent
    ///
    /// # Returns
    /// The updated category
    ///
    /// # Errors
    /// - `Validation` if a new name is set but shorter than two characters
    /// - `Api` if the backend rejects the request
    pub async fn update(
        &self,
        id: &str,
        input: UpdateCategoryInput,
    ) -> Result<ArticleCategory, CategoryServiceError> {
        // Validate input
        self.validate_update_input(&input)?;

        // Update the category on the backend
        let category = self.api.update_category(id, &input).await?;

        // Invalidate cache
        self.invalidate_cache().await?;

        Ok(category)
    }

    /// Delete a category
    ///
    /// # Arguments
    /// * `id` - Category ID to delete
    pub async fn delete(&self, id: &str) -> Result<(), CategoryServiceError> {
        // Delete the category on the backend
        self.api.delete_category(id).await?;

        // Invalidate cache
        self.invalidate_cache().await?;

        Ok(())
    }

    // ========================================================================
    // Private helper methods
    // ========================================================================

    /// Validate category creation input
    fn validate_create_input(&self, input: &CreateCategoryInput) -> Result<(), CategoryServiceError> {
        if input.name.trim().is_empty() {
            return Err(CategoryServiceError::Validation(
                "Category name is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate category update input
    fn validate_update_input(&self, input: &UpdateCategoryInput) -> Result<(), CategoryServiceError> {
        if let Some(ref name) = input.name {
            if name.trim().chars().count() < 2 {
                return Err(CategoryServiceError::Validation(
                    "Category name must be at least 2 characters".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Invalidate all category-related cache entries
    async fn invalidate_cache(&self) -> Result<(), CategoryServiceError> {
        let _ = self.cache.delete_pattern(CACHE_PATTERN_CATEGORIES).await;
        Ok(())
    }
}
