//! API layer - typed HTTP client for the backend
//!
//! This module contains everything that talks to the backend's `/admin/*`
//! endpoints:
//! - `ApiClient` with timeout, bearer auth, and retry with backoff
//! - Envelope decoding (`{data}` and `{data, pagination}` bodies)
//! - Error normalization into `ApiError`
//! - Per-resource endpoint methods (categories, guestbook, publications)

mod categories;
mod client;
mod envelope;
mod error;
mod guestbook;
mod publications;

pub use client::{ApiClient, MultipartFields, RetryPolicy};
pub use envelope::{ApiResponse, GuestBookPage, RawPage};
pub use error::{ApiError, ErrorBody, ErrorContext};
