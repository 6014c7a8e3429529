use http::Method;
use serde_json::Value;

use crate::logger::ApiLogger;

mod builder;
pub use self::builder::ApiClientBuilder;

mod execution;

mod parameters;
pub use self::parameters::{CallHeaders, QueryParams, RequestConfig};

mod response;
pub use self::response::{ApiResponse, UNREADABLE_BODY};

mod error;
pub use self::error::ApiClientError;

/// Fluent HTTP request builder and executor.
///
/// Configure the next call with the `with_*` setters, then dispatch it with
/// [`get`](Self::get), [`post`](Self::post), [`put`](Self::put) or
/// [`delete`](Self::delete). Each dispatch:
///
/// - resolves `base URL + path + query`,
/// - logs the request, sends it, logs the response,
/// - fails with [`ApiClientError::RequestFailed`] when the status is not `2xx`,
/// - and leaves the client with an empty [`RequestConfig`] whatever the outcome.
///
/// The base URL is a session setting: set once with [`with_url`](Self::with_url)
/// or [`ApiClientBuilder::with_base_url`], it survives every dispatch.
///
/// # Example
///
/// ```rust,no_run
/// use apicheck_core::ApiClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut api = ApiClient::builder()
///     .with_base_url("https://conduit-api.bondaracademy.com/api")
///     .build();
///
/// let response = api
///     .with_path("/articles")
///     .with_params([("limit", 10), ("offset", 0)])
///     .get()
///     .await?;
///
/// assert_eq!(response.status(), 200);
/// let body: serde_json::Value = response.json()?;
/// assert!(body["articlesCount"].as_u64().is_some());
///
/// // On failure, the error message embeds this log
/// println!("{}", api.logs());
/// # Ok(())
/// # }
/// ```
///
/// # Concurrency
///
/// Dispatch takes `&mut self`: two calls cannot overlap on the same client.
/// Share a [`reqwest::Client`] through the builder to reuse connections
/// across several `ApiClient` values instead.
#[derive(Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    default_base_url: Option<String>,
    base_url: Option<String>,
    request: RequestConfig,
    logger: ApiLogger,
}

// Create
impl ApiClient {
    /// Creates a builder with no default base URL and a fresh logger.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }
}

// Configure
impl ApiClient {
    /// Sets the base URL. It persists across dispatches.
    pub fn with_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the path appended verbatim to the base URL.
    pub fn with_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.request.path = path.into();
        self
    }

    /// Sets the query parameters; `null` values are dropped from the URL.
    pub fn with_params(&mut self, params: impl Into<QueryParams>) -> &mut Self {
        self.request.params = params.into();
        self
    }

    /// Sets the headers, replacing the ones configured before.
    pub fn with_headers(&mut self, headers: impl Into<CallHeaders>) -> &mut Self {
        self.request.headers = headers.into();
        self
    }

    /// Sets the JSON body. Only `POST` and `PUT` send it.
    pub fn with_body(&mut self, body: impl Into<Value>) -> &mut Self {
        self.request.body = Some(body.into());
        self
    }

    /// The configuration the next dispatch will consume.
    pub fn pending(&self) -> &RequestConfig {
        &self.request
    }

    /// The base URL the next dispatch will use, if any.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .or(self.default_base_url.as_deref())
    }
}

// Dispatch
impl ApiClient {
    /// Sends a `GET` request. Any configured body is ignored.
    ///
    /// # Errors
    ///
    /// See [`ApiClientError`].
    pub async fn get(&mut self) -> Result<ApiResponse, ApiClientError> {
        self.dispatch(Method::GET).await
    }

    /// Sends a `POST` request with the configured body.
    ///
    /// # Errors
    ///
    /// See [`ApiClientError`].
    pub async fn post(&mut self) -> Result<ApiResponse, ApiClientError> {
        self.dispatch(Method::POST).await
    }

    /// Sends a `PUT` request with the configured body.
    ///
    /// # Errors
    ///
    /// See [`ApiClientError`].
    pub async fn put(&mut self) -> Result<ApiResponse, ApiClientError> {
        self.dispatch(Method::PUT).await
    }

    /// Sends a `DELETE` request. Any configured body is ignored.
    ///
    /// # Errors
    ///
    /// See [`ApiClientError`].
    pub async fn delete(&mut self) -> Result<ApiResponse, ApiClientError> {
        self.dispatch(Method::DELETE).await
    }
}

// Logs
impl ApiClient {
    /// Renders the request/response log.
    pub fn logs(&self) -> String {
        self.logger.recent_logs()
    }

    /// Empties the request/response log.
    pub fn clear_logs(&mut self) {
        self.logger.clear_logs();
    }

    /// The logger attached to this client.
    pub fn logger(&self) -> &ApiLogger {
        &self.logger
    }
}
