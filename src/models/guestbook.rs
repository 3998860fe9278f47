//! Guestbook entry model
//!
//! Entries are created by visitors on the public site. The admin console
//! only lists, inspects, and removes them, so there are no input types here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Guestbook entry left by a site visitor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuestBookEntry {
    /// Unique identifier
    pub id: String,
    /// Visitor name
    pub name: String,
    /// Where the visitor came from
    pub origin: String,
    /// Purpose of the visit
    pub purpose: String,
    /// URL of the stored selfie image, when one was taken
    pub selfie_image: Option<String>,
    /// URL of the stored signature image, when one was drawn
    pub signature_image: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
