//! Guestbook API endpoints
//!
//! Typed methods for the guestbook endpoints:
//! - GET    /admin/guestbook     - paginated list (nested envelope)
//! - GET    /admin/guestbook/:id - single entry
//! - DELETE /admin/guestbook/:id - delete

use super::client::ApiClient;
use super::envelope::GuestBookPage;
use super::error::{ApiError, ErrorContext};
use crate::models::{GuestBookEntry, ListQuery, Page};

const GET_GUESTBOOKS: ErrorContext =
    ErrorContext::new("GET_GUESTBOOKS_ERROR", "Failed to fetch guestbook entries");
const GET_GUESTBOOK_BY_ID: ErrorContext = ErrorContext::new(
    "GET_GUESTBOOK_BY_ID_ERROR",
    "Failed to fetch guestbook entry details",
);
const DELETE_GUESTBOOK: ErrorContext =
    ErrorContext::new("DELETE_GUESTBOOK_ERROR", "Failed to delete guestbook entry");

impl ApiClient {
    /// List guestbook entries with pagination
    ///
    /// The guestbook list nests `{guestbooks, pagination}` inside `data`;
    /// the result is normalized to the common page container.
    pub async fn list_guestbook(
        &self,
        query: &ListQuery,
    ) -> Result<Page<GuestBookEntry>, ApiError> {
        let page: GuestBookPage = self
            .get_data("/admin/guestbook", &query.to_pairs(), GET_GUESTBOOKS)
            .await?;
        Ok(page.into_page())
    }

    /// Fetch a single guestbook entry
    pub async fn get_guestbook_entry(&self, id: &str) -> Result<GuestBookEntry, ApiError> {
        self.get_data(&format!("/admin/guestbook/{}", id), &[], GET_GUESTBOOK_BY_ID)
            .await
    }

    /// Delete a guestbook entry
    pub async fn delete_guestbook_entry(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/admin/guestbook/{}", id), DELETE_GUESTBOOK)
            .await
    }
}
