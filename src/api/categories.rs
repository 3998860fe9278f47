//! Category API endpoints
//!
//! Typed methods for the category endpoints:
//! - GET    /admin/categories        - paginated list
//! - GET    /admin/categories/all    - full list, no pagination
//! - GET    /admin/categories/:id    - single category
//! - POST   /admin/categories        - create
//! - PUT    /admin/categories/:id    - update
//! - DELETE /admin/categories/:id    - delete

use super::client::ApiClient;
use super::error::{ApiError, ErrorContext};
use crate::models::{ArticleCategory, CreateCategoryInput, ListQuery, Page, UpdateCategoryInput};

const GET_CATEGORIES: ErrorContext = ErrorContext::new(
    "GET_ARTICLE_CATEGORIES_ERROR",
    "Failed to fetch article categories",
);
const GET_ALL_CATEGORIES: ErrorContext = ErrorContext::new(
    "GET_ALL_ARTICLE_CATEGORIES_ERROR",
    "Failed to fetch all article categories",
);
const GET_CATEGORY_BY_ID: ErrorContext = ErrorContext::new(
    "GET_ARTICLE_CATEGORY_BY_ID_ERROR",
    "Failed to fetch article category details",
);
const CREATE_CATEGORY: ErrorContext = ErrorContext::new(
    "CREATE_ARTICLE_CATEGORY_ERROR",
    "Failed to create article category",
);
const UPDATE_CATEGORY: ErrorContext = ErrorContext::new(
    "UPDATE_ARTICLE_CATEGORY_ERROR",
    "Failed to update article category",
);
const DELETE_CATEGORY: ErrorContext = ErrorContext::new(
    "DELETE_ARTICLE_CATEGORY_ERROR",
    "Failed to delete article category",
);

impl ApiClient {
    /// List categories with pagination
    pub async fn list_categories(
        &self,
        query: &ListQuery,
    ) -> Result<Page<ArticleCategory>, ApiError> {
        self.get_page("/admin/categories", &query.to_pairs(), GET_CATEGORIES)
            .await
    }

    /// Fetch every category without pagination
    pub async fn list_all_categories(&self) -> Result<Vec<ArticleCategory>, ApiError> {
        self.get_data("/admin/categories/all", &[], GET_ALL_CATEGORIES)
            .await
    }

    /// Fetch a single category
    pub async fn get_category(&self, id: &str) -> Result<ArticleCategory, ApiError> {
        self.get_data(&format!("/admin/categories/{}", id), &[], GET_CATEGORY_BY_ID)
            .await
    }

    /// Create a category
    pub async fn create_category(
        &self,
        input: &CreateCategoryInput,
    ) -> Result<ArticleCategory, ApiError> {
        self.post_json("/admin/categories", input, CREATE_CATEGORY)
            .await
    }

    /// Update a category
    pub async fn update_category(
        &self,
        id: &str,
        input: &UpdateCategoryInput,
    ) -> Result<ArticleCategory, ApiError> {
        self.put_json(&format!("/admin/categories/{}", id), input, UPDATE_CATEGORY)
            .await
    }

    /// Delete a category
    pub async fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/admin/categories/{}", id), DELETE_CATEGORY)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RetryPolicy;
    use crate::config::BackendConfig;
    use crate::models::SortOrder;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> ApiClient {
        let config = BackendConfig {
            base_url: server.uri(),
            timeout_secs: 5,
            auth_token: None,
        };
        let retry = RetryPolicy {
            max_retries: 0,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
        };
        ApiClient::new(&config, retry).expect("client should build")
    }

    fn category_page_body() -> serde_json::Value {
        json!({
            "data": [{"id": "cat-1", "name": "News"}],
            "pagination": {"totalData": 1, "page": 1, "limit": 10, "totalPage": 1}
        })
    }

    #[tokio::test]
    async fn test_list_sends_full_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/categories"))
            .and(query_param("page", "3"))
            .and(query_param("limit", "10"))
            .and(query_param("search", "press"))
            .and(query_param("sortBy", "name"))
            .and(query_param("sortOrder", "desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(category_page_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let query = ListQuery::new(3, 10)
            .with_search("press")
            .with_sort("name", SortOrder::Desc);
        let page = client.list_categories(&query).await.unwrap();

        assert_eq!(page.len(), 1);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_list_omits_unset_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/categories"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "10"))
            .and(query_param_is_missing("search"))
            .and(query_param_is_missing("sortBy"))
            .and(query_param_is_missing("sortOrder"))
            .respond_with(ResponseTemplate::new(200).set_body_json(category_page_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.list_categories(&ListQuery::default()).await.unwrap();
        server.verify().await;
    }

    #[tokio::test]
    async fn test_list_all_hits_unpaginated_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/categories/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": "cat-1", "name": "News"},
                    {"id": "cat-2", "name": "Events"}
                ]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let categories = client.list_all_categories().await.unwrap();
        assert_eq!(categories.len(), 2);
    }

    #[tokio::test]
    async fn test_create_posts_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/categories"))
            .and(body_json(json!({"name": "Announcements"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(
                json!({"data": {"id": "cat-9", "name": "Announcements"}}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let created = client
            .create_category(&CreateCategoryInput::new("Announcements"))
            .await
            .unwrap();

        assert_eq!(created.id, "cat-9");
        server.verify().await;
    }

    #[tokio::test]
    async fn test_update_puts_to_category_path() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/admin/categories/cat-1"))
            .and(body_json(json!({"name": "Press"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"id": "cat-1", "name": "Press"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let updated = client
            .update_category("cat-1", &UpdateCategoryInput::new().with_name("Press"))
            .await
            .unwrap();

        assert_eq!(updated.name, "Press");
        server.verify().await;
    }

    #[tokio::test]
    async fn test_delete_targets_category_path() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/admin/categories/cat-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.delete_category("cat-1").await.unwrap();
        server.verify().await;
    }

    #[tokio::test]
    async fn test_delete_failure_uses_delete_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/admin/categories/cat-1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let error = client.delete_category("cat-1").await.unwrap_err();
        assert_eq!(error.code, "DELETE_ARTICLE_CATEGORY_ERROR");
        assert_eq!(error.message, "Failed to delete article category");
    }
}
