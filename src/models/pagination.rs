//! Pagination envelope types
//!
//! List endpoints return rows alongside a `pagination` block whose fields
//! are camelCase on the wire. `Page` is the normalized container the rest
//! of the crate works with; it serializes cleanly so cached pages round-trip.

use serde::{Deserialize, Serialize};

/// Pagination block returned inside list envelopes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Total number of rows across all pages
    pub total_data: u64,
    /// Current page number (1-based)
    pub page: u32,
    /// Rows per page
    pub limit: u32,
    /// Total number of pages
    pub total_page: u32,
}

/// One page of results with its pagination details
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    /// Rows in the current page
    pub items: Vec<T>,
    /// Pagination details
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }

    /// Total number of pages in the result set
    pub fn total_pages(&self) -> u32 {
        self.pagination.total_page
    }

    /// Whether a next page exists
    pub fn has_next(&self) -> bool {
        self.pagination.page < self.pagination.total_page
    }

    /// Whether a previous page exists
    pub fn has_prev(&self) -> bool {
        self.pagination.page > 1
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
