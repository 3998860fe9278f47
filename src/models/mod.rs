//! Data models
//!
//! This module contains the data structures shared across the pressroom
//! admin console. Models represent:
//! - Backend entities (ArticleCategory, GuestBookEntry, Publication)
//! - Input types for create and update operations
//! - List query parameters and the table-state adapter
//! - The pagination envelope shared by every list endpoint

mod category;
mod guestbook;
mod pagination;
mod params;
mod publication;

pub use category::{ArticleCategory, CreateCategoryInput, UpdateCategoryInput};
pub use guestbook::GuestBookEntry;
pub use pagination::{Page, Pagination};
pub use params::{ListQuery, PublicationListQuery, SortOrder, TableState};
pub use publication::{
    CategoryRef, CreatePublicationInput, ImageUpload, Language, Publication, PublicationKind,
    UpdatePublicationInput,
};
