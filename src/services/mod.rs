//! Services layer - Business logic
//!
//! This module contains all business logic services for the admin console.
//! Services are responsible for:
//! - Implementing business rules and input validation
//! - Coordinating between the API client and cache
//! - Invalidating cached data after mutations
//!
//! Reads are cache-first with a configurable staleness window; every mutation
//! clears the cached entries of its resource so the next read is fresh.

pub mod category;
pub mod guestbook;
pub mod markdown;
pub mod publication;

pub use category::{CategoryService, CategoryServiceError};
pub use guestbook::{GuestBookService, GuestBookServiceError};
pub use markdown::MarkdownRenderer;
pub use publication::{PublicationService, PublicationServiceError};
