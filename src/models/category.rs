//! Article category model
//!
//! Categories label publications. They are flat (no hierarchy) and carry a
//! single editable field, the name.

use serde::{Deserialize, Serialize};

/// Article category entity as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleCategory {
    /// Unique identifier assigned by the backend
    pub id: String,
    /// Category name
    pub name: String,
}

/// Input for creating a new category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCategoryInput {
    /// Category name
    pub name: String,
}

impl CreateCategoryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Input for updating a category
///
/// Fields left as `None` are omitted from the request body and keep their
/// current value on the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateCategoryInput {
    /// New name (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UpdateCategoryInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_input_serializes_name() {
        let input = CreateCategoryInput::new("Announcements");
        let json = serde_json::to_value(&input).unwrap();

        assert_eq!(json, serde_json::json!({ "name": "Announcements" }));
    }

    #[test]
    fn test_update_input_omits_unset_fields() {
        let empty = UpdateCategoryInput::new();
        let json = serde_json::to_value(&empty).unwrap();
        assert_eq!(json, serde_json::json!({}));

        let renamed = UpdateCategoryInput::new().with_name("Press Releases");
        let json = serde_json::to_value(&renamed).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Press Releases" }));
    }

    #[test]
    fn test_category_deserializes_from_backend_shape() {
        let json = r#"{"id": "cat-1", "name": "News"}"#;
        let category: ArticleCategory = serde_json::from_str(json).unwrap();

        assert_eq!(category.id, "cat-1");
        assert_eq!(category.name, "News");
    }
}
