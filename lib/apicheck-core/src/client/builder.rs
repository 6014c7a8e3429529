use super::{ApiClient, RequestConfig};
use crate::logger::ApiLogger;

/// Builder for [`ApiClient`] instances.
///
/// # Default Configuration
///
/// - **HTTP client**: a new [`reqwest::Client`]
/// - **Base URL**: none, every call needs [`ApiClient::with_url`]
/// - **Logger**: a new, empty [`ApiLogger`]
///
/// # Example
///
/// ```rust
/// use apicheck_core::{ApiClient, ApiLogger};
///
/// let shared = reqwest::Client::new();
/// let api = ApiClient::builder()
///     .with_http_client(shared.clone())
///     .with_base_url("https://api.example.com")
///     .with_logger(ApiLogger::new())
///     .build();
///
/// assert_eq!(api.base_url(), Some("https://api.example.com"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ApiClientBuilder {
    client: Option<reqwest::Client>,
    base_url: Option<String>,
    logger: Option<ApiLogger>,
}

impl ApiClientBuilder {
    /// Builds the client.
    pub fn build(self) -> ApiClient {
        let Self {
            client,
            base_url,
            logger,
        } = self;

        ApiClient {
            client: client.unwrap_or_default(),
            default_base_url: base_url,
            base_url: None,
            request: RequestConfig::default(),
            logger: logger.unwrap_or_default(),
        }
    }

    /// Uses this HTTP client (connection pool, cookies, timeouts) for every dispatch.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the base URL used when [`ApiClient::with_url`] was never called.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Attaches a logger, typically one created for the current test.
    pub fn with_logger(mut self, logger: ApiLogger) -> Self {
        self.logger = Some(logger);
        self
    }
}
