//! Publication API endpoints
//!
//! Typed methods for the publication endpoints:
//! - GET    /admin/publications     - paginated list with lang/type filters
//! - GET    /admin/publications/:id - single publication
//! - POST   /admin/publications     - create (multipart)
//! - PUT    /admin/publications/:id - update (multipart)
//! - DELETE /admin/publications/:id - delete
//!
//! Writes go over multipart so the cover image can ride along with the text
//! fields. Category IDs repeat under the `category_ids[]` field name and the
//! `type` field carries the publication kind.

use chrono::{DateTime, SecondsFormat, Utc};

use super::client::{ApiClient, MultipartFields};
use super::error::{ApiError, ErrorContext};
use crate::models::{
    CreatePublicationInput, Page, Publication, PublicationListQuery, UpdatePublicationInput,
};

const GET_PUBLICATIONS: ErrorContext =
    ErrorContext::new("GET_PUBLICATIONS_ERROR", "Failed to fetch publications");
const GET_PUBLICATION_BY_ID: ErrorContext = ErrorContext::new(
    "GET_PUBLICATION_BY_ID_ERROR",
    "Failed to fetch publication details",
);
const CREATE_PUBLICATION: ErrorContext =
    ErrorContext::new("CREATE_PUBLICATION_ERROR", "Failed to create publication");
const UPDATE_PUBLICATION: ErrorContext =
    ErrorContext::new("UPDATE_PUBLICATION_ERROR", "Failed to update publication");
const DELETE_PUBLICATION: ErrorContext =
    ErrorContext::new("DELETE_PUBLICATION_ERROR", "Failed to delete publication");

impl ApiClient {
    /// List publications with pagination and optional filters
    pub async fn list_publications(
        &self,
        query: &PublicationListQuery,
    ) -> Result<Page<Publication>, ApiError> {
        self.get_page("/admin/publications", &query.to_pairs(), GET_PUBLICATIONS)
            .await
    }

    /// Fetch a single publication
    pub async fn get_publication(&self, id: &str) -> Result<Publication, ApiError> {
        self.get_data(
            &format!("/admin/publications/{}", id),
            &[],
            GET_PUBLICATION_BY_ID,
        )
        .await
    }

    /// Create a publication from a multipart form
    pub async fn create_publication(
        &self,
        input: &CreatePublicationInput,
    ) -> Result<Publication, ApiError> {
        self.post_multipart("/admin/publications", create_form(input), CREATE_PUBLICATION)
            .await
    }

    /// Update a publication, sending only the fields that are set
    pub async fn update_publication(
        &self,
        id: &str,
        input: &UpdatePublicationInput,
    ) -> Result<Publication, ApiError> {
        self.put_multipart(
            &format!("/admin/publications/{}", id),
            update_form(input),
            UPDATE_PUBLICATION,
        )
        .await
    }

    /// Delete a publication
    pub async fn delete_publication(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/admin/publications/{}", id), DELETE_PUBLICATION)
            .await
    }
}

/// Build the multipart form for a create request
fn create_form(input: &CreatePublicationInput) -> MultipartFields {
    let mut fields = MultipartFields::new()
        .text("title", input.title.clone())
        .text("content", input.content.clone())
        .text("date", format_date(&input.date));
    for id in &input.category_ids {
        fields = fields.text("category_ids[]", id.clone());
    }
    fields = fields.text("type", input.kind.as_str());
    if let Some(ref image) = input.image {
        fields = fields.file("image", image.clone());
    }
    fields
}

/// Build the multipart form for an update request, set fields only
fn update_form(input: &UpdatePublicationInput) -> MultipartFields {
    let mut fields = MultipartFields::new();
    if let Some(ref title) = input.title {
        fields = fields.text("title", title.clone());
    }
    if let Some(ref content) = input.content {
        fields = fields.text("content", content.clone());
    }
    if let Some(ref date) = input.date {
        fields = fields.text("date", format_date(date));
    }
    if let Some(ref ids) = input.category_ids {
        for id in ids {
            fields = fields.text("category_ids[]", id.clone());
        }
    }
    if let Some(kind) = input.kind {
        fields = fields.text("type", kind.as_str());
    }
    if let Some(ref image) = input.image {
        fields = fields.file("image", image.clone());
    }
    fields
}

/// Publication dates go over the wire as UTC RFC 3339 with milliseconds
fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}
