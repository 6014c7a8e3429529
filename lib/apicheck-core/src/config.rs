//! Test run configuration read from the environment.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::auth::SecureString;
use crate::schema::DEFAULT_SCHEMA_ROOT;

/// Target environment, selected with `TEST_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display)]
pub enum TestEnvironment {
    /// `dev`, the default.
    #[default]
    #[display("dev")]
    Dev,
    /// `qa`
    #[display("qa")]
    Qa,
    /// `prod`
    #[display("prod")]
    Prod,
}

impl TestEnvironment {
    /// Parses an environment name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dev" => Some(Self::Dev),
            "qa" => Some(Self::Qa),
            "prod" => Some(Self::Prod),
            _ => None,
        }
    }

    /// API URL used when `API_URL` is not set.
    pub fn default_api_url(self) -> &'static str {
        match self {
            Self::Dev => "https://conduit-api.bondaracademy.com/api",
            Self::Qa => "https://qa-conduit-api.bondaracademy.com/api",
            Self::Prod => "https://prod-conduit-api.bondaracademy.com/api",
        }
    }
}

/// Settings shared by every test of a run.
#[derive(Debug, Clone)]
pub struct ApiTestConfig {
    /// Selected environment.
    pub environment: TestEnvironment,
    /// Base URL of the API under test.
    pub api_url: String,
    /// Login identifier of the test user.
    pub user_email: Option<String>,
    /// Password of the test user.
    pub user_password: Option<SecureString>,
    /// Directory holding the response schemas.
    pub schema_root: PathBuf,
}

impl ApiTestConfig {
    /// Configuration for `api_url`, without credentials, with the default schema root.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            environment: TestEnvironment::default(),
            api_url: api_url.into(),
            user_email: None,
            user_password: None,
            schema_root: PathBuf::from(DEFAULT_SCHEMA_ROOT),
        }
    }

    /// Reads `TEST_ENV`, `API_URL`, `USER_EMAIL`, `USER_PASSWORD` and `SCHEMA_ROOT`
    /// from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable lookup.
    ///
    /// ```rust
    /// use apicheck_core::{ApiTestConfig, TestEnvironment};
    ///
    /// let config = ApiTestConfig::from_lookup(|key| match key {
    ///     "TEST_ENV" => Some("qa".to_string()),
    ///     _ => None,
    /// });
    ///
    /// assert_eq!(config.environment, TestEnvironment::Qa);
    /// assert_eq!(config.api_url, "https://qa-conduit-api.bondaracademy.com/api");
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let environment = match var("TEST_ENV") {
            None => TestEnvironment::default(),
            Some(name) => TestEnvironment::parse(&name).unwrap_or_else(|| {
                warn!(%name, "unknown TEST_ENV, falling back to dev");
                TestEnvironment::default()
            }),
        };

        let api_url = var("API_URL").unwrap_or_else(|| environment.default_api_url().to_string());
        let schema_root = var("SCHEMA_ROOT").map_or_else(|| PathBuf::from(DEFAULT_SCHEMA_ROOT), PathBuf::from);

        let config = Self {
            environment,
            api_url,
            user_email: var("USER_EMAIL"),
            user_password: var("USER_PASSWORD").map(SecureString::from),
            schema_root,
        };
        debug!(?config, "test configuration loaded");
        config
    }

    /// Sets the test user credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        email: impl Into<String>,
        password: impl Into<SecureString>,
    ) -> Self {
        self.user_email = Some(email.into());
        self.user_password = Some(password.into());
        self
    }

    /// Sets the schema root directory.
    #[must_use]
    pub fn with_schema_root(mut self, schema_root: impl Into<PathBuf>) -> Self {
        self.schema_root = schema_root.into();
        self
    }

    /// Both credentials, when configured.
    pub fn credentials(&self) -> Option<(&str, &SecureString)> {
        self.user_email.as_deref().zip(self.user_password.as_ref())
    }
}
