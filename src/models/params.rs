//! List query parameters and the table-state adapter
//!
//! Every list endpoint accepts the same paging, search, and sort parameters.
//! `ListQuery` is the wire-facing form (1-based page, camelCase parameter
//! names); `TableState` mirrors a paginated table widget (0-based page index)
//! and translates into a `ListQuery`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::publication::{Language, PublicationKind};

/// Upper bound for rows per page accepted by the backend
const MAX_LIMIT: u32 = 100;

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("invalid sort order '{}', expected 'asc' or 'desc'", s)),
        }
    }
}

/// Query parameters shared by every list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListQuery {
    /// Page number (1-based)
    pub page: u32,
    /// Rows per page
    pub limit: u32,
    /// Search term, omitted from the request when empty
    pub search: Option<String>,
    /// Column to sort by
    pub sort_by: Option<String>,
    /// Sort direction
    pub sort_order: Option<SortOrder>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
            sort_by: None,
            sort_order: None,
        }
    }
}

impl ListQuery {
    /// Create a query with page and limit clamped to valid ranges
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn with_sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(column.into());
        self.sort_order = Some(order);
        self
    }

    /// Render the query as wire pairs using the backend's parameter names
    ///
    /// `page` and `limit` are always present; the rest appear only when set.
    /// Empty search terms are treated as unset.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(ref sort_by) = self.sort_by {
            pairs.push(("sortBy", sort_by.clone()));
        }
        if let Some(order) = self.sort_order {
            pairs.push(("sortOrder", order.to_string()));
        }
        pairs
    }

    /// Stable cache-key fragment for this query
    pub fn cache_key(&self) -> String {
        let pairs: Vec<String> = self
            .to_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        pairs.join("&")
    }
}

/// List query for publications, adding language and type filters
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicationListQuery {
    /// Common paging, search, and sort parameters
    pub list: ListQuery,
    /// Filter by content language
    pub language: Option<Language>,
    /// Filter by publication type
    pub kind: Option<PublicationKind>,
}

impl PublicationListQuery {
    pub fn new(list: ListQuery) -> Self {
        Self {
            list,
            language: None,
            kind: None,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_kind(mut self, kind: PublicationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Render the query as wire pairs, filters last
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.list.to_pairs();
        if let Some(language) = self.language {
            pairs.push(("lang", language.to_string()));
        }
        if let Some(kind) = self.kind {
            pairs.push(("type", kind.to_string()));
        }
        pairs
    }

    /// Stable cache-key fragment for this query
    pub fn cache_key(&self) -> String {
        let pairs: Vec<String> = self
            .to_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        pairs.join("&")
    }
}

/// Paginated table state, translated into backend query parameters
///
/// Mirrors a table widget: a 0-based page index and page size, at most one
/// sort column, and an applied search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    /// Current page index (0-based)
    pub page_index: u32,
    /// Rows per page
    pub page_size: u32,
    /// Active sort column and direction
    pub sort: Option<(String, SortOrder)>,
    /// Applied search term
    pub search: Option<String>,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: 10,
            sort: None,
            search: None,
        }
    }
}

impl TableState {
    pub fn new(page_index: u32, page_size: u32) -> Self {
        Self {
            page_index,
            page_size,
            ..Self::default()
        }
    }

    /// Translate into a backend list query
    ///
    /// The wire `page` is 1-based, so the current index is shifted by one.
    pub fn to_query(&self) -> ListQuery {
        ListQuery {
            page: self.page_index + 1,
            limit: self.page_size.clamp(1, MAX_LIMIT),
            search: self
                .search
                .clone()
                .filter(|s| !s.trim().is_empty()),
            sort_by: self.sort.as_ref().map(|(column, _)| column.clone()),
            sort_order: self.sort.as_ref().map(|(_, order)| *order),
        }
    }

    /// Jump back to the first page when the current index fell past the last
    /// page, e.g. after a delete shrank the result set.
    ///
    /// Returns `true` when the index was reset. A `total_pages` of zero means
    /// the result set is empty and the index is left alone.
    pub fn reset_if_out_of_range(&mut self, total_pages: u32) -> bool {
        if total_pages > 0 && self.page_index >= total_pages {
            self.page_index = 0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert!(query.search.is_none());
        assert!(query.sort_by.is_none());
        assert!(query.sort_order.is_none());
    }

    #[test]
    fn test_list_query_new_clamps_ranges() {
        let query = ListQuery::new(0, 0);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 1);

        let query = ListQuery::new(7, 500);
        assert_eq!(query.page, 7);
        assert_eq!(query.limit, 100);
    }

    #[test]
    fn test_to_pairs_includes_only_set_parameters() {
        let query = ListQuery::new(2, 25);
        assert_eq!(
            query.to_pairs(),
            vec![("page", "2".to_string()), ("limit", "25".to_string())]
        );

        let query = ListQuery::new(1, 10)
            .with_search("annual report")
            .with_sort("name", SortOrder::Desc);
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page", "1".to_string()),
                ("limit", "10".to_string()),
                ("search", "annual report".to_string()),
                ("sortBy", "name".to_string()),
                ("sortOrder", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_to_pairs_drops_blank_search() {
        let query = ListQuery::new(1, 10).with_search("   ");
        assert_eq!(query.to_pairs().len(), 2);
    }

    #[test]
    fn test_cache_key_is_stable() {
        let query = ListQuery::new(3, 10).with_sort("created_at", SortOrder::Asc);
        assert_eq!(query.cache_key(), "page=3&limit=10&sortBy=created_at&sortOrder=asc");
        assert_eq!(query.cache_key(), query.clone().cache_key());
    }

    #[test]
    fn test_publication_query_appends_filters() {
        let query = PublicationListQuery::new(ListQuery::new(1, 10))
            .with_language(Language::Id)
            .with_kind(PublicationKind::News);

        assert_eq!(
            query.to_pairs(),
            vec![
                ("page", "1".to_string()),
                ("limit", "10".to_string()),
                ("lang", "id".to_string()),
                ("type", "News".to_string()),
            ]
        );
        assert_eq!(query.cache_key(), "page=1&limit=10&lang=id&type=News");
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("upward".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_table_state_translates_to_wire_query() {
        let state = TableState {
            page_index: 2,
            page_size: 10,
            sort: Some(("name".to_string(), SortOrder::Desc)),
            search: Some("x".to_string()),
        };

        let query = state.to_query();
        assert_eq!(
            query.cache_key(),
            "page=3&limit=10&search=x&sortBy=name&sortOrder=desc"
        );
    }

    #[test]
    fn test_table_state_drops_blank_search() {
        let state = TableState {
            search: Some("  ".to_string()),
            ..TableState::default()
        };
        assert!(state.to_query().search.is_none());
    }

    #[test]
    fn test_reset_when_index_past_last_page() {
        let mut state = TableState::new(5, 10);
        assert!(state.reset_if_out_of_range(3));
        assert_eq!(state.page_index, 0);
    }

    #[test]
    fn test_reset_boundary_is_inclusive() {
        // Index 3 addresses the fourth page, which does not exist when
        // there are exactly three pages.
        let mut state = TableState::new(3, 10);
        assert!(state.reset_if_out_of_range(3));
        assert_eq!(state.page_index, 0);
    }

    #[test]
    fn test_no_reset_within_range_or_empty() {
        let mut state = TableState::new(2, 10);
        assert!(!state.reset_if_out_of_range(3));
        assert_eq!(state.page_index, 2);

        let mut state = TableState::new(4, 10);
        assert!(!state.reset_if_out_of_range(0));
        assert_eq!(state.page_index, 4);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(20))]

            #[test]
            fn prop_new_query_is_always_in_range(page in 0u32..10_000, limit in 0u32..10_000) {
                let query = ListQuery::new(page, limit);
                prop_assert!(query.page >= 1);
                prop_assert!(query.limit >= 1 && query.limit <= 100);
            }

            #[test]
            fn prop_table_state_page_is_index_plus_one(index in 0u32..100_000, size in 1u32..100) {
                let state = TableState::new(index, size);
                prop_assert_eq!(state.to_query().page, index + 1);
            }

            #[test]
            fn prop_reset_leaves_index_valid(index in 0u32..1000, total in 0u32..1000) {
                let mut state = TableState::new(index, 10);
                state.reset_if_out_of_range(total);
                prop_assert!(total == 0 || state.page_index < total);
            }
        }
    }
}
