use std::future::Future;

use serde_json::{Value, json};
use tracing::{debug, info};

use super::{AuthError, AuthToken, SecureString};
use crate::ApiClient;
use crate::logger::ApiLogger;

/// Trades credentials for an [`AuthToken`].
pub trait TokenProvider {
    /// Logs in with `identifier` and `secret`, returning a ready-to-send header value.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Request`] when the login call fails,
    /// - [`AuthError::MissingToken`] when its body has no token.
    fn create_token(
        &self,
        identifier: &str,
        secret: &SecureString,
    ) -> impl Future<Output = Result<AuthToken, AuthError>> + Send;
}

/// Conduit style login: `POST {base}/users/login` with `{"user": {"email", "password"}}`,
/// token read from `user.token` and sent as `Token <token>`.
#[derive(Debug, Clone)]
pub struct LoginTokenProvider {
    base_url: String,
    login_path: String,
}

impl LoginTokenProvider {
    /// Login path appended to the base URL.
    pub const DEFAULT_LOGIN_PATH: &str = "/users/login";

    /// Creates a provider for the API at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            login_path: Self::DEFAULT_LOGIN_PATH.to_string(),
        }
    }

    /// Overrides the login path.
    #[must_use]
    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }
}

impl TokenProvider for LoginTokenProvider {
    async fn create_token(
        &self,
        identifier: &str,
        secret: &SecureString,
    ) -> Result<AuthToken, AuthError> {
        info!(%identifier, "logging in");
        let mut api = isolated_client(&self.base_url);

        let response = api
            .with_path(self.login_path.as_str())
            .with_body(json!({
                "user": {
                    "email": identifier,
                    "password": secret.as_str(),
                }
            }))
            .post()
            .await?;

        let body = response.json_value()?;
        let token = extract_token(&body, "/user/token", "user.token")?;
        debug!(%identifier, "token created");

        Ok(AuthToken::new(format!("Token {token}")))
    }
}

/// OAuth2 resource-owner password grant, token read from `access_token`
/// and sent as `Bearer <token>`.
///
/// The whole token endpoint URL is given; no path is appended.
#[derive(Debug, Clone)]
pub struct PasswordGrantTokenProvider {
    token_url: String,
    client_id: String,
    client_secret: SecureString,
    audience: Option<String>,
}

impl PasswordGrantTokenProvider {
    /// Creates a provider for the token endpoint at `token_url`.
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            audience: None,
        }
    }

    /// Requests a token for this audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }
}

impl TokenProvider for PasswordGrantTokenProvider {
    async fn create_token(
        &self,
        identifier: &str,
        secret: &SecureString,
    ) -> Result<AuthToken, AuthError> {
        info!(%identifier, client_id = %self.client_id, "requesting password grant");
        let mut api = isolated_client(&self.token_url);

        let mut form = json!({
            "grant_type": "password",
            "client_id": self.client_id,
            "client_secret": self.client_secret.as_str(),
            "username": identifier,
            "password": secret.as_str(),
        });
        if let (Some(audience), Some(form)) = (&self.audience, form.as_object_mut()) {
            form.insert("audience".to_string(), Value::from(audience.as_str()));
        }

        let response = api.with_body(form).post().await?;

        let body = response.json_value()?;
        let token = extract_token(&body, "/access_token", "access_token")?;
        debug!(%identifier, "access token created");

        Ok(AuthToken::new(format!("Bearer {token}")))
    }
}

/// Logs in against the Conduit style endpoint at `{base_url}/users/login`.
///
/// # Errors
///
/// See [`TokenProvider::create_token`].
pub async fn create_token(
    base_url: &str,
    identifier: &str,
    secret: &SecureString,
) -> Result<AuthToken, AuthError> {
    LoginTokenProvider::new(base_url)
        .create_token(identifier, secret)
        .await
}

/// Body keys never written to the login call log.
const SECRET_FIELDS: [&str; 2] = ["password", "client_secret"];

// New connection pool and logger: the login call shares nothing with ordinary calls
fn isolated_client(base_url: &str) -> ApiClient {
    ApiClient::builder()
        .with_http_client(reqwest::Client::new())
        .with_base_url(base_url)
        .with_logger(ApiLogger::new().with_redacted_fields(SECRET_FIELDS))
        .build()
}

fn extract_token<'a>(
    body: &'a Value,
    pointer: &str,
    field: &'static str,
) -> Result<&'a str, AuthError> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::MissingToken {
            field,
            body: body.clone(),
        })
}
