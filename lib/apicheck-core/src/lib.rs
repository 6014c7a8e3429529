//! # Apicheck Core
//!
//! Building blocks for black-box REST API test suites.
//!
//! - **[`ApiClient`]** - fluent request builder and executor; every call is logged
//!   and any non-`2xx` status fails with the full log attached
//! - **[`ApiLogger`]** - per-client request/response log
//! - **[`SchemaValidator`]** - JSON Schema checks of response bodies, loaded from disk
//! - **[`TokenProvider`](auth::TokenProvider)** - login calls returning an `Authorization` header value
//! - **[`ApiFixture`]** - run-scoped wiring: configuration, shared token, per-test clients
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use apicheck_core::{ApiClient, validate_schema};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut api = ApiClient::builder()
//!     .with_base_url("https://conduit-api.bondaracademy.com/api")
//!     .build();
//!
//! let response = api.with_path("/tags").get().await?;
//! let body = response.json_value()?;
//!
//! validate_schema("conduit/tags", "GET_tags", &body).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Authenticated calls
//!
//! ```rust,no_run
//! use apicheck_core::{ApiClient, SecureString, auth::create_token};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let base_url = "https://conduit-api.bondaracademy.com/api";
//! let token = create_token(base_url, "tester@example.com", &SecureString::from("secret")).await?;
//!
//! let mut api = ApiClient::builder().with_base_url(base_url).build();
//! api.with_path("/articles")
//!     .with_headers(token.to_headers())
//!     .with_body(json!({ "article": { "title": "Hello", "description": "", "body": "" } }))
//!     .post()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - [`ApiClientError`] - configuration, HTTP status and transport errors, with the log snapshot
//! - [`SchemaError`] - schema loading and validation errors
//! - [`AuthError`](auth::AuthError) - token creation errors
//! - [`FixtureError`] - shared token and attachment errors
//!
//! ## Re-exports
//!
//! All commonly used types are re-exported from the crate root for convenience.

mod client;

pub mod auth;

mod config;

pub mod fixture;

pub mod logger;

pub mod schema;

// Public API
pub use self::auth::{AuthToken, SecureString};
pub use self::client::{
    ApiClient, ApiClientBuilder, ApiClientError, ApiResponse, CallHeaders, QueryParams,
    RequestConfig, UNREADABLE_BODY,
};
pub use self::config::{ApiTestConfig, TestEnvironment};
pub use self::fixture::{ApiFixture, FixtureError, LogAttachment};
pub use self::logger::{ApiLogger, LogEntry, RequestLog, ResponseLog};
pub use self::schema::{
    DEFAULT_SCHEMA_ROOT, SchemaError, SchemaValidator, SchemaViolation, validate_schema,
};
