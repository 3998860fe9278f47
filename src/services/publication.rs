//! Publication service
//!
//! Implements business logic for publication management:
//! - Paginated listing with search, sorting, language, and type filters
//! - Create, read, update, delete publications
//! - Input and cover-image validation before any request is sent
//!
//! Publications are written as multipart form data because a cover image may
//! ride along with the text fields. Reads go through the cache first;
//! mutations invalidate every cached publication entry.

use crate::api::{ApiClient, ApiError};
use crate::cache::{Cache, CacheLayer};
use crate::config::UploadConfig;
use crate::models::{
    CreatePublicationInput, ImageUpload, Page, Publication, PublicationListQuery,
    UpdatePublicationInput,
};
use std::sync::Arc;
use std::time::Duration;

/// Default age after which cached publication data is refetched (5 minutes)
const PUBLICATION_STALE_SECS: u64 = 300;

/// Cache key prefixes
const CACHE_KEY_PUBLICATION_LIST: &str = "publications:list:";
const CACHE_KEY_PUBLICATION_BY_ID: &str = "publications:id:";
const CACHE_PATTERN_PUBLICATIONS: &str = "publications:*";

/// Error types for publication service operations
#[derive(Debug, thiserror::Error)]
pub enum PublicationServiceError {
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

/// Publication service backed by the admin API
pub struct PublicationService {
    api: Arc<ApiClient>,
    cache: Arc<Cache>,
    upload: UploadConfig,
    stale_after: Duration,
}

impl PublicationService {
    /// Create a new publication service
    pub fn new(api: Arc<ApiClient>, cache: Arc<Cache>, upload: UploadConfig) -> Self {
        Self {
            api,
            cache,
            upload,
            stale_after: Duration::from_secs(PUBLICATION_STALE_SECS),
        }
    }

    /// Create a new publication service with a custom staleness window
    pub fn with_stale_after(
        api: Arc<ApiClient>,
        cache: Arc<Cache>,
        upload: UploadConfig,
        stale_after: Duration,
    ) -> Self {
        Self {
            api,
            cache,
            upload,
            stale_after,
        }
    }

    /// List publications with pagination and filters
    ///
    /// # Arguments
    /// * `query` - Page, limit, search, sort, language, and type parameters
    ///
    /// # Returns
    /// One page of publications with pagination metadata
    pub async fn list(
        &self,
        query: &PublicationListQuery,
    ) -> Result<Page<Publication>, PublicationServiceError> {
        // Try cache first
        let cache_key = format!("{}{}", CACHE_KEY_PUBLICATION_LIST, query.cache_key());
        if let Some(page) = self
            .cache
            .get::<Page<Publication>>(&cache_key, self.stale_after)
            .await
            .ok()
            .flatten()
        {
            return Ok(page);
        }

        // Fetch from the backend
        let page = self.api.list_publications(query).await?;

        // Cache the result
        let _ = self.cache.set(&cache_key, &page).await;

        Ok(page)
    }

    /// Get publication by ID
    ///
    /// # Arguments
    /// * `id` - Publication ID
    pub async fn get_by_id(&self, id: &str) -> Result<Publication, PublicationServiceError> {
        // Try cache first
        let cache_key = format!("{}{}", CACHE_KEY_PUBLICATION_BY_ID, id);
        if let Some(publication) = self
            .cache
            .get::<Publication>(&cache_key, self.stale_after)
            .await
            .ok()
            .flatten()
        {
            return Ok(publication);
        }

        // Fetch from the backend
        let publication = self.api.get_publication(id).await?;

        // Cache the result
        let _ = self.cache.set(&cache_key, &publication).await;

        Ok(publication)
    }

    /// Create a new publication
    ///
    /// # Arguments
    /// * `input` - Publication creation input, cover image included
    ///
    /// # Returns
    /// The created publication
    ///
    /// # Errors
    /// - `Validation` if the title, content, categories, or image are invalid
    /// - `Api` if the backend rejects the request
    pub async fn create(
        &self,
        input: CreatePublicationInput,
    ) -> Result<Publication, PublicationServiceError> {
        // Validate input
        self.validate_create_input(&input)?;

        // Create the publication on the backend
        let publication = self.api.create_publication(&input).await?;

        // Invalidate cache
        self.invalidate_cache().await?;

        Ok(publication)
    }

    /// Update a publication
    ///
    /// # Arguments
    /// * `id` - Publication ID to update
    /// * `input` - Update input, only set fields are sent
    ///
    /// # Returns
    /// The updated publication
    ///
    /// # Errors
    /// - `Validation` if a set field fails validation
    /// - `Api` if the backend rejects the request
    pub async fn update(
        &self,
        id: &str,
        input: UpdatePublicationInput,
    ) -> Result<Publication, PublicationServiceError> {
        // Validate input
        self.validate_update_input(&input)?;

        // Update the publication on the backend
        let publication = self.api.update_publication(id, &input).await?;

        // Invalidate cache
        self.invalidate_cache().await?;

        Ok(publication)
    }

    /// Delete a publication
    ///
    /// # Arguments
    /// * `id` - Publication ID to delete
    pub async fn delete(&self, id: &str) -> Result<(), PublicationServiceError> {
        // Delete the publication on the backend
        self.api.delete_publication(id).await?;

        // Invalidate cache
        self.invalidate_cache().await?;

        Ok(())
    }

    // ========================================================================
    // Private helper methods
    // ========================================================================

    /// Validate publication creation input
    fn validate_create_input(
        &self,
        input: &CreatePublicationInput,
    ) -> Result<(), PublicationServiceError> {
        if input.title.trim().chars().count() < 3 {
            return Err(PublicationServiceError::Validation(
                "Title must be at least 3 characters".to_string(),
            ));
        }
        if input.content.trim().chars().count() < 10 {
            return Err(PublicationServiceError::Validation(
                "Content must be at least 10 characters".to_string(),
            ));
        }
        if input.category_ids.is_empty() {
            return Err(PublicationServiceError::Validation(
                "At least one category is required".to_string(),
            ));
        }
        if input.category_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(PublicationServiceError::Validation(
                "Category ids cannot be empty".to_string(),
            ));
        }
        match input.image {
            Some(ref image) => self.validate_image(image)?,
            None => {
                return Err(PublicationServiceError::Validation(
                    "A publication image is required".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Validate publication update input
    ///
    /// Only set fields are checked; the image keeps its current value on the
    /// backend when omitted.
    fn validate_update_input(
        &self,
        input: &UpdatePublicationInput,
    ) -> Result<(), PublicationServiceError> {
        if let Some(ref title) = input.title {
            if title.trim().chars().count() < 3 {
                return Err(PublicationServiceError::Validation(
                    "Title must be at least 3 characters".to_string(),
                ));
            }
        }
        if let Some(ref content) = input.content {
            if content.trim().chars().count() < 10 {
                return Err(PublicationServiceError::Validation(
                    "Content must be at least 10 characters".to_string(),
                ));
            }
        }
        if let Some(ref category_ids) = input.category_ids {
            if category_ids.is_empty() || category_ids.iter().any(|id| id.trim().is_empty()) {
                return Err(PublicationServiceError::Validation(
                    "Category ids cannot be empty".to_string(),
                ));
            }
        }
        if let Some(ref image) = input.image {
            self.validate_image(image)?;
        }
        Ok(())
    }

    /// Validate a cover image against the configured size and type limits
    fn validate_image(&self, image: &ImageUpload) -> Result<(), PublicationServiceError> {
        if image.size() > self.upload.max_image_size {
            return Err(PublicationServiceError::Validation(format!(
                "Image size must not exceed {}",
                self.upload.max_size_label()
            )));
        }
        if !self.upload.is_type_allowed(&image.content_type) {
            return Err(PublicationServiceError::Validation(format!(
                "Image type '{}' is not allowed; expected one of: {}",
                image.content_type,
                self.upload.allowed_image_types.join(", ")
            )));
        }
        Ok(())
    }

    /// Invalidate all publication-related cache entries
    async fn invalidate_cache(&self) -> Result<(), PublicationServiceError> {
        let _ = self.cache.delete_pattern(CACHE_PATTERN_PUBLICATIONS).await;
        Ok(())
    }
}
