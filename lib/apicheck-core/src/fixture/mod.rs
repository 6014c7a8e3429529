//! Per-run fixture wiring configuration, authentication and clients.
//!
//! One [`ApiFixture`] lives for the whole run (or worker) and is shared by
//! reference. It logs in at most once, then hands every test a fresh
//! [`ApiClient`] whose log only holds that test's calls.
//!
//! ```rust,no_run
//! use apicheck_core::{ApiFixture, ApiTestConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fixture = ApiFixture::new(ApiTestConfig::from_env());
//!
//! let mut api = fixture.api();
//! let response = api
//!     .with_path("/articles")
//!     .with_headers(fixture.authorized_headers().await?)
//!     .with_body(serde_json::json!({ "article": { "title": "Hello" } }))
//!     .post()
//!     .await?;
//!
//! fixture
//!     .validator()
//!     .validate("conduit/articles", "POST_articles", &response.json_value()?)
//!     .await?;
//!
//! let attachment = fixture.attach_logs("create article", &mut api);
//! attachment.write_to("target/test-logs").await?;
//! # Ok(())
//! # }
//! ```

use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::auth::{AuthToken, LoginTokenProvider, TokenProvider};
use crate::config::ApiTestConfig;
use crate::logger::ApiLogger;
use crate::schema::SchemaValidator;
use crate::{ApiClient, CallHeaders};

mod attachment;
pub use self::attachment::LogAttachment;

mod error;
pub use self::error::FixtureError;

/// Run-scoped fixture: configuration, a shared connection pool and the cached token.
#[derive(Debug)]
pub struct ApiFixture<P = LoginTokenProvider> {
    config: ApiTestConfig,
    provider: P,
    http: reqwest::Client,
    token: OnceCell<Result<AuthToken, String>>,
}

impl ApiFixture {
    /// Creates a fixture logging in with `POST {api_url}/users/login`.
    pub fn new(config: ApiTestConfig) -> Self {
        let provider = LoginTokenProvider::new(config.api_url.as_str());
        Self::with_provider(config, provider)
    }
}

impl<P> ApiFixture<P>
where
    P: TokenProvider,
{
    /// Creates a fixture with a custom token provider.
    pub fn with_provider(config: ApiTestConfig, provider: P) -> Self {
        Self {
            config,
            provider,
            http: reqwest::Client::new(),
            token: OnceCell::new(),
        }
    }

    /// The run configuration.
    pub fn config(&self) -> &ApiTestConfig {
        &self.config
    }

    /// The shared token, created on first use.
    ///
    /// The outcome of the first attempt is kept, success or failure. Concurrent
    /// first callers wait for the single login in flight.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::TokenUnavailable`] when credentials are missing or the login failed.
    pub async fn auth_token(&self) -> Result<&AuthToken, FixtureError> {
        let outcome = self
            .token
            .get_or_init(|| async {
                let Some((email, password)) = self.config.credentials() else {
                    error!("no credentials configured");
                    return Err("USER_EMAIL and USER_PASSWORD must be set".to_string());
                };

                info!(%email, "creating shared auth token");
                self.provider
                    .create_token(email, password)
                    .await
                    .map_err(|err| {
                        error!(%err, "failed to create auth token");
                        err.to_string()
                    })
            })
            .await;

        outcome
            .as_ref()
            .map_err(|message| FixtureError::TokenUnavailable {
                message: message.clone(),
            })
    }

    /// Headers holding the shared token.
    ///
    /// # Errors
    ///
    /// See [`auth_token`](Self::auth_token).
    pub async fn authorized_headers(&self) -> Result<CallHeaders, FixtureError> {
        let token = self.auth_token().await?;
        Ok(token.to_headers())
    }

    /// A fresh client for one test: its own logger, the configured API URL as default
    /// base URL, the fixture connection pool.
    pub fn api(&self) -> ApiClient {
        ApiClient::builder()
            .with_http_client(self.http.clone())
            .with_base_url(self.config.api_url.as_str())
            .with_logger(ApiLogger::new())
            .build()
    }

    /// A validator reading schemas under the configured root.
    pub fn validator(&self) -> SchemaValidator {
        SchemaValidator::new(self.config.schema_root.clone())
    }

    /// Takes the client's log as an attachment named after `step`, then clears it.
    pub fn attach_logs(&self, step: impl Into<String>, api: &mut ApiClient) -> LogAttachment {
        let attachment = LogAttachment {
            name: step.into(),
            contents: api.logs(),
        };
        api.clear_logs();
        info!(name = %attachment.name, "logs attached");
        attachment
    }
}
