use http::header::{HeaderName, HeaderValue};
use indexmap::IndexMap;
use serde::Serialize;

use crate::client::error::ApiClientError;

/// HTTP headers for an API call.
///
/// Headers keep their insertion order, which is also the order they appear in
/// the request log.
///
/// # Example
///
/// ```rust
/// use apicheck_core::CallHeaders;
///
/// let headers = CallHeaders::new()
///     .add_header("Authorization", "Token abc123")
///     .add_header("X-Request-ID", "abc-123-def");
///
/// assert_eq!(headers.get("authorization"), Some("Token abc123"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CallHeaders {
    headers: IndexMap<String, String>,
}

impl CallHeaders {
    /// Creates a new empty `CallHeaders` instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header, replacing a previous value with the same name.
    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Merges another `CallHeaders` instance into this one.
    ///
    /// Headers from `other` override headers with the same name.
    pub fn merge(mut self, other: Self) -> Self {
        self.headers.extend(other.headers);
        self
    }

    /// Looks a header up, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Checks if the headers collection is empty.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns the number of headers.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Converts headers to typed HTTP header pairs for reqwest.
    pub(in crate::client) fn to_http_headers(
        &self,
    ) -> Result<Vec<(HeaderName, HeaderValue)>, ApiClientError> {
        self.headers
            .iter()
            .map(|(name, value)| {
                let name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|err| ApiClientError::unexpected(&err))?;
                let value =
                    HeaderValue::from_str(value).map_err(|err| ApiClientError::unexpected(&err))?;
                Ok((name, value))
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for CallHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let headers = iter
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self { headers }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for CallHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(headers: [(K, V); N]) -> Self {
        headers.into_iter().collect()
    }
}
