//! Publication model
//!
//! This module defines the Publication entity and related types:
//! - `Publication` with its `Language` and `PublicationKind` enums
//! - Input types for creating and updating publications
//! - `ImageUpload` carrying a cover image selected on the client side
//!
//! The backend names the publication type field `type` on the wire; it is
//! `kind` here to stay clear of the keyword.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Publication entity as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Publication {
    /// Unique identifier
    pub id: String,
    /// URL-friendly slug derived from the title
    pub slug: String,
    /// Publication title
    pub title: String,
    /// HTML content as stored by the backend
    pub content: String,
    /// Publication date
    pub date: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Content language
    pub language: Language,
    /// Publication type
    #[serde(rename = "type")]
    pub kind: PublicationKind,
    /// Linked category IDs
    #[serde(default)]
    pub category_ids: Option<Vec<String>>,
    /// Linked categories with their names resolved
    #[serde(default)]
    pub categories: Option<Vec<CategoryRef>>,
    /// Cover image URL
    #[serde(default)]
    pub image: Option<String>,
    /// Social preview image URL
    #[serde(default)]
    pub image_og: Option<String>,
}

/// Category reference embedded in a publication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
}

/// Content language of a publication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Indonesian
    Id,
    /// English
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Id => "id",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "id" => Ok(Language::Id),
            "en" => Ok(Language::En),
            _ => Err(format!("invalid language '{}', expected 'id' or 'en'", s)),
        }
    }
}

/// Publication type
///
/// The wire values are capitalized (`News`, `Article`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicationKind {
    News,
    Article,
}

impl PublicationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationKind::News => "News",
            PublicationKind::Article => "Article",
        }
    }
}

impl fmt::Display for PublicationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublicationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "news" => Ok(PublicationKind::News),
            "article" => Ok(PublicationKind::Article),
            _ => Err(format!(
                "invalid publication type '{}', expected 'News' or 'Article'",
                s
            )),
        }
    }
}

/// Image file payload for multipart submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name
    pub filename: String,
    /// MIME type
    pub content_type: String,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Size of the file in bytes
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Guess the MIME type from a file name's extension
    pub fn mime_from_filename(name: &str) -> Option<&'static str> {
        let extension = Path::new(name).extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "webp" => Some("image/webp"),
            _ => None,
        }
    }
}

/// Input for creating a publication
///
/// The cover image is optional at the type level so the same struct can be
/// built incrementally; creation is rejected during validation when it is
/// missing.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePublicationInput {
    /// Publication title
    pub title: String,
    /// Prepared HTML content
    pub content: String,
    /// Publication date
    pub date: DateTime<Utc>,
    /// Linked category IDs
    pub category_ids: Vec<String>,
    /// Publication type
    pub kind: PublicationKind,
    /// Cover image file
    pub image: Option<ImageUpload>,
}

impl CreatePublicationInput {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        date: DateTime<Utc>,
        kind: PublicationKind,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            date,
            category_ids: Vec::new(),
            kind,
            image: None,
        }
    }

    pub fn with_category(mut self, id: impl Into<String>) -> Self {
        self.category_ids.push(id.into());
        self
    }

    pub fn with_categories(mut self, ids: Vec<String>) -> Self {
        self.category_ids = ids;
        self
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }
}

/// Input for updating a publication
///
/// Fields left as `None` are omitted from the multipart body and keep their
/// current value on the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePublicationInput {
    /// New title (optional)
    pub title: Option<String>,
    /// New HTML content (optional)
    pub content: Option<String>,
    /// New publication date (optional)
    pub date: Option<DateTime<Utc>>,
    /// Replacement category IDs (optional)
    pub category_ids: Option<Vec<String>>,
    /// New publication type (optional)
    pub kind: Option<PublicationKind>,
    /// Replacement cover image (optional)
    pub image: Option<ImageUpload>,
}

impl UpdatePublicationInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_categories(mut self, ids: Vec<String>) -> Self {
        self.category_ids = Some(ids);
        self
    }

    pub fn with_kind(mut self, kind: PublicationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.content.is_some()
            || self.date.is_some()
            || self.category_ids.is_some()
            || self.kind.is_some()
            || self.image.is_some()
    }
}
