//! Response envelope types
//!
//! Success bodies wrap their payload as `{data}`; list bodies add a
//! `pagination` block. The guestbook list is the odd one out and nests its
//! rows and pagination inside `data`, so `GuestBookPage` captures that shape
//! and normalizes it into the common `Page` container.

use serde::Deserialize;

use crate::models::{GuestBookEntry, Page, Pagination};

/// Standard `{data}` envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Standard `{data, pagination}` list envelope
#[derive(Debug, Clone, Deserialize)]
pub struct RawPage<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> RawPage<T> {
    /// Normalize into the common page container
    pub fn into_page(self) -> Page<T> {
        Page::new(self.data, self.pagination)
    }
}

/// Guestbook list payload, nested inside the `{data}` envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GuestBookPage {
    pub guestbooks: Vec<GuestBookEntry>,
    pub pagination: Pagination,
}

impl GuestBookPage {
    /// Normalize into the common page container
    pub fn into_page(self) -> Page<GuestBookEntry> {
        Page::new(self.guestbooks, self.pagination)
    }
}
