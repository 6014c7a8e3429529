//! Authentication token acquisition.
//!
//! A [`TokenProvider`] trades credentials for an [`AuthToken`], a value
//! ready to be used as an `Authorization` header. Providers run their login
//! call on their own short-lived [`ApiClient`](crate::ApiClient): no cookie,
//! header or log entry leaks between authentication and ordinary calls.

use std::fmt;

use serde_json::Value;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{ApiClientError, CallHeaders};

mod provider;
pub use self::provider::{
    LoginTokenProvider, PasswordGrantTokenProvider, TokenProvider, create_token,
};

/// Errors that can occur while creating a token.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum AuthError {
    /// The login call itself failed: bad credentials, transport failure, non-JSON body.
    #[display("Token request failed: {_0}")]
    Request(ApiClientError),

    /// The login call succeeded but the expected token field is absent.
    #[from(ignore)]
    #[display("Token field '{field}' missing from login response: {body}")]
    MissingToken {
        /// Dotted path of the expected field.
        field: &'static str,
        /// The login response body.
        body: Value,
    },
}

/// String holding a secret, zeroed on drop and never displayed in full.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Wraps a secret.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The secret itself. Avoid keeping the reference around.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks whether the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn masked(&self) -> String {
        let len = self.0.chars().count();
        if len <= 8 {
            return "***".to_string();
        }
        let head: String = self.0.chars().take(4).collect();
        let tail: String = self.0.chars().skip(len - 4).collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecureString").field(&"[REDACTED]").finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// An `Authorization` header value, scheme included (`Token abc123`, `Bearer xyz`).
///
/// Once created, a token is never modified; share it by reference.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(SecureString);

impl AuthToken {
    /// Wraps a header value that already includes its scheme.
    pub fn new(header_value: impl Into<String>) -> Self {
        Self(SecureString::new(header_value))
    }

    /// The value to send in the `Authorization` header.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Headers holding `Authorization: <token>`.
    pub fn to_headers(&self) -> CallHeaders {
        CallHeaders::new().add_header("Authorization", self.as_str())
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthToken").field(&self.0).finish()
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
