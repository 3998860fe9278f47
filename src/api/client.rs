//! HTTP client for the backend admin API
//!
//! Wraps reqwest with the configured base URL, timeout, and optional bearer
//! token, retries transient failures with exponential backoff, and decodes
//! the `{data}` / `{data, pagination}` envelopes. Multipart bodies are held
//! as plain fields and rebuilt for every attempt, since a reqwest form
//! cannot be reused once sent.

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::envelope::{ApiResponse, RawPage};
use super::error::{ApiError, ErrorBody, ErrorContext};
use crate::config::{BackendConfig, RetryConfig};
use crate::models::{ImageUpload, Page};

/// Retry schedule with exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Upper bound for the backoff delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(20_000),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Backoff delay after the given failed attempt (0-based)
    ///
    /// Doubles the base delay per attempt and caps at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.base_delay.as_millis() as u64;
        let cap = self.max_delay.as_millis() as u64;
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(base.saturating_mul(factor).min(cap))
    }
}

/// Multipart form fields in a rebuildable shape
///
/// A fresh `reqwest::multipart::Form` is produced from these per attempt.
#[derive(Debug, Clone, Default)]
pub struct MultipartFields {
    texts: Vec<(&'static str, String)>,
    file: Option<(&'static str, ImageUpload)>,
}

impl MultipartFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field
    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.texts.push((name, value.into()));
        self
    }

    /// Attach a file field
    pub fn file(mut self, name: &'static str, upload: ImageUpload) -> Self {
        self.file = Some((name, upload));
        self
    }

    fn to_form(&self) -> Result<Form, reqwest::Error> {
        let mut form = Form::new();
        for (name, value) in &self.texts {
            form = form.text(*name, value.clone());
        }
        if let Some((name, upload)) = &self.file {
            let part = Part::bytes(upload.bytes.clone())
                .file_name(upload.filename.clone())
                .mime_str(&upload.content_type)?;
            form = form.part(*name, part);
        }
        Ok(form)
    }
}

/// Request body variants
#[derive(Debug, Clone)]
enum Body {
    None,
    Json(serde_json::Value),
    Multipart(MultipartFields),
}

/// Typed HTTP client for the backend admin API
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Build a client from the backend configuration
    pub fn new(config: &BackendConfig, retry: RetryPolicy) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
            retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Typed request helpers used by the per-resource endpoint methods
    // ========================================================================

    /// GET a `{data}` envelope and unwrap the payload
    pub(crate) async fn get_data<T>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
        ctx: ErrorContext,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(Method::GET, path, query, &Body::None, ctx).await?;
        Self::decode::<ApiResponse<T>>(response, ctx)
            .await
            .map(|envelope| envelope.data)
    }

    /// GET a `{data, pagination}` list envelope
    pub(crate) async fn get_page<T>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
        ctx: ErrorContext,
    ) -> Result<Page<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(Method::GET, path, query, &Body::None, ctx).await?;
        Self::decode::<RawPage<T>>(response, ctx)
            .await
            .map(RawPage::into_page)
    }

    /// POST a JSON body and unwrap the `{data}` payload
    pub(crate) async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let body = Self::json_body(body, ctx)?;
        let response = self.send(Method::POST, path, &[], &body, ctx).await?;
        Self::decode::<ApiResponse<T>>(response, ctx)
            .await
            .map(|envelope| envelope.data)
    }

    /// PUT a JSON body and unwrap the `{data}` payload
    pub(crate) async fn put_json<B, T>(
        &self,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let body = Self::json_body(body, ctx)?;
        let response = self.send(Method::PUT, path, &[], &body, ctx).await?;
        Self::decode::<ApiResponse<T>>(response, ctx)
            .await
            .map(|envelope| envelope.data)
    }

    /// POST a multipart body and unwrap the `{data}` payload
    pub(crate) async fn post_multipart<T>(
        &self,
        path: &str,
        fields: MultipartFields,
        ctx: ErrorContext,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let body = Body::Multipart(fields);
        let response = self.send(Method::POST, path, &[], &body, ctx).await?;
        Self::decode::<ApiResponse<T>>(response, ctx)
            .await
            .map(|envelope| envelope.data)
    }

    /// PUT a multipart body and unwrap the `{data}` payload
    pub(crate) async fn put_multipart<T>(
        &self,
        path: &str,
        fields: MultipartFields,
        ctx: ErrorContext,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let body = Body::Multipart(fields);
        let response = self.send(Method::PUT, path, &[], &body, ctx).await?;
        Self::decode::<ApiResponse<T>>(response, ctx)
            .await
            .map(|envelope| envelope.data)
    }

    /// DELETE a resource, ignoring the response body
    pub(crate) async fn delete(&self, path: &str, ctx: ErrorContext) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, &[], &Body::None, ctx)
            .await?;
        Ok(())
    }

    // ========================================================================
    // Request execution
    // ========================================================================

    /// Send a request, retrying transient failures per the retry policy
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: &Body,
        ctx: ErrorContext,
    ) -> Result<reqwest::Response, ApiError> {
        let mut attempt = 0;
        loop {
            match self.try_send(&method, path, query, body, ctx).await {
                Ok(response) => return Ok(response),
                Err(error) => {
                    if attempt >= self.retry.max_retries || !error.is_retryable() {
                        return Err(error);
                    }
                    let delay = self.retry.delay_for(attempt);
                    attempt += 1;
                    tracing::warn!(
                        "{} {} failed ({}), retry {}/{} in {:?}",
                        method,
                        path,
                        error.code,
                        attempt,
                        self.retry.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Send one attempt and normalize any failure
    async fn try_send(
        &self,
        method: &Method,
        path: &str,
        query: &[(&'static str, String)],
        body: &Body,
        ctx: ErrorContext,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self.http.request(method.clone(), self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }
        request = match body {
            Body::None => request,
            Body::Json(value) => request.json(value),
            Body::Multipart(fields) => {
                let form = fields.to_form().map_err(|e| {
                    tracing::debug!("failed to build multipart form: {}", e);
                    ApiError::fallback(ctx)
                })?;
                request.multipart(form)
            }
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("{} {} transport error: {}", method, path, e);
                return Err(ApiError::fallback(ctx));
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        Err(ApiError::from_response(status.as_u16(), body, ctx))
    }

    fn json_body<B: Serialize>(body: &B, ctx: ErrorContext) -> Result<Body, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| {
            tracing::debug!("failed to serialize request body: {}", e);
            ApiError::fallback(ctx)
        })?;
        Ok(Body::Json(value))
    }

    /// Decode a success body, falling back to the operation's error context
    async fn decode<E>(response: reqwest::Response, ctx: ErrorContext) -> Result<E, ApiError>
    where
        E: DeserializeOwned,
    {
        match response.json::<E>().await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::debug!("failed to decode response body: {}", e);
                Err(ApiError::fallback(ctx))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleCategory;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_CTX: ErrorContext = ErrorContext::new("GET_THINGS_ERROR", "Failed to fetch things");

    fn fast_retry(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
        }
    }

    fn test_client(server: &MockServer, retry: RetryPolicy) -> ApiClient {
        let config = BackendConfig {
            base_url: server.uri(),
            timeout_secs: 5,
            auth_token: None,
        };
        ApiClient::new(&config, retry).expect("client should build")
    }

    fn test_client_with_token(server: &MockServer, token: &str) -> ApiClient {
        let config = BackendConfig {
            base_url: server.uri(),
            timeout_secs: 5,
            auth_token: Some(token.to_string()),
        };
        ApiClient::new(&config, fast_retry(0)).expect("client should build")
    }

    // ========================================================================
    // Retry policy tests
    // ========================================================================

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(4), Duration::from_millis(16_000));
        assert_eq!(policy.delay_for(5), Duration::from_millis(20_000));
        assert_eq!(policy.delay_for(63), Duration::from_millis(20_000));
        assert_eq!(policy.delay_for(200), Duration::from_millis(20_000));
    }

    #[test]
    fn test_policy_from_config() {
        let policy = RetryPolicy::from_config(&RetryConfig::default());
        assert_eq!(policy, RetryPolicy::default());
    }

    // ========================================================================
    // Request execution tests
    // ========================================================================

    #[tokio::test]
    async fn test_get_data_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/categories/cat-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"id": "cat-1", "name": "News"}})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server, fast_retry(0));
        let category: ArticleCategory = client
            .get_data("/admin/categories/cat-1", &[], TEST_CTX)
            .await
            .unwrap();

        assert_eq!(category.name, "News");
    }

    #[tokio::test]
    async fn test_bearer_token_is_attached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/categories/cat-1"))
            .and(header("authorization", "Bearer sekrit"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"id": "cat-1", "name": "News"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client_with_token(&server, "sekrit");
        let result: Result<ArticleCategory, _> =
            client.get_data("/admin/categories/cat-1", &[], TEST_CTX).await;

        assert!(result.is_ok());
        server.verify().await;
    }

    #[tokio::test]
    async fn test_retries_transient_failure_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/categories/cat-1"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/admin/categories/cat-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"id": "cat-1", "name": "News"}})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server, fast_retry(3));
        let category: ArticleCategory = client
            .get_data("/admin/categories/cat-1", &[], TEST_CTX)
            .await
            .unwrap();

        assert_eq!(category.id, "cat-1");
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/categories/cat-1"))
            .respond_with(ResponseTemplate::new(500))
            .expect(4)
            .mount(&server)
            .await;

        let client = test_client(&server, fast_retry(3));
        let result: Result<ArticleCategory, _> =
            client.get_data("/admin/categories/cat-1", &[], TEST_CTX).await;

        let error = result.unwrap_err();
        assert_eq!(error.status, Some(500));
        server.verify().await;
    }

    #[tokio::test]
    async fn test_does_not_retry_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/categories/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, fast_retry(3));
        let result: Result<ArticleCategory, _> = client
            .get_data("/admin/categories/missing", &[], TEST_CTX)
            .await;

        assert_eq!(result.unwrap_err().status, Some(404));
        server.verify().await;
    }

    #[tokio::test]
    async fn test_does_not_retry_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/categories/cat-1"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, fast_retry(3));
        let result: Result<ArticleCategory, _> =
            client.get_data("/admin/categories/cat-1", &[], TEST_CTX).await;

        assert_eq!(result.unwrap_err().status, Some(401));
        server.verify().await;
    }

    #[tokio::test]
    async fn test_failure_body_is_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/categories/cat-1"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "errors": "Category is in use",
                "code": "CATEGORY_IN_USE",
                "details": {"publications": 3}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server, fast_retry(0));
        let error = client
            .get_data::<ArticleCategory>("/admin/categories/cat-1", &[], TEST_CTX)
            .await
            .unwrap_err();

        assert_eq!(error.code, "CATEGORY_IN_USE");
        assert_eq!(error.message, "Category is in use");
        assert_eq!(error.details, Some(json!({"publications": 3})));
        assert_eq!(error.status, Some(422));
    }

    #[tokio::test]
    async fn test_bare_failure_uses_fallback_context() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/categories/cat-1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server, fast_retry(0));
        let error = client
            .get_data::<ArticleCategory>("/admin/categories/cat-1", &[], TEST_CTX)
            .await
            .unwrap_err();

        assert_eq!(error.code, "GET_THINGS_ERROR");
        assert_eq!(error.message, "Failed to fetch things");
    }

    #[tokio::test]
    async fn test_undecodable_success_body_uses_fallback_context() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/categories/cat-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server, fast_retry(0));
        let error = client
            .get_data::<ArticleCategory>("/admin/categories/cat-1", &[], TEST_CTX)
            .await
            .unwrap_err();

        assert_eq!(error.code, "GET_THINGS_ERROR");
        assert!(error.status.is_none());
    }

    #[tokio::test]
    async fn test_connection_failure_uses_fallback_context() {
        // Unroutable port, nothing is listening
        let config = BackendConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            auth_token: None,
        };
        let client = ApiClient::new(&config, fast_retry(0)).unwrap();

        let error = client
            .get_data::<ArticleCategory>("/admin/categories/cat-1", &[], TEST_CTX)
            .await
            .unwrap_err();

        assert_eq!(error.code, "GET_THINGS_ERROR");
        assert!(error.status.is_none());
    }

    #[tokio::test]
    async fn test_multipart_form_is_rebuilt_per_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/publications"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/admin/publications"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server, fast_retry(2));
        let fields = MultipartFields::new()
            .text("title", "Hello")
            .file("image", ImageUpload::new("c.png", "image/png", vec![1, 2, 3]));

        let value: serde_json::Value = client
            .post_multipart("/admin/publications", fields, TEST_CTX)
            .await
            .unwrap();
        assert_eq!(value["ok"], true);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        // Both attempts must carry the full form
        for request in &requests {
            let body = String::from_utf8_lossy(&request.body);
            assert!(body.contains("name=\"title\""));
            assert!(body.contains("name=\"image\""));
            assert!(body.contains("filename=\"c.png\""));
        }
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_trimmed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/categories/cat-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"id": "cat-1", "name": "News"}})),
            )
            .mount(&server)
            .await;

        let config = BackendConfig {
            base_url: format!("{}/", server.uri()),
            timeout_secs: 5,
            auth_token: None,
        };
        let client = ApiClient::new(&config, fast_retry(0)).unwrap();

        let result: Result<ArticleCategory, _> =
            client.get_data("/admin/categories/cat-1", &[], TEST_CTX).await;
        assert!(result.is_ok());
    }
}
