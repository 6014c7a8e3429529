//! Per-call request configuration.
//!
//! - [`QueryParams`] - Query string parameters
//! - [`CallHeaders`] - HTTP headers
//! - [`RequestConfig`] - Path, query, headers and body accumulated for the next dispatch

use serde_json::Value;

mod query;
pub use self::query::QueryParams;

mod headers;
pub use self::headers::CallHeaders;

/// Configuration accumulated by the fluent setters of [`ApiClient`](crate::ApiClient).
///
/// A configuration is consumed by exactly one dispatch; the client then starts
/// over from [`RequestConfig::default`]. The base URL is not part of it and
/// persists across dispatches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestConfig {
    pub(in crate::client) path: String,
    pub(in crate::client) params: QueryParams,
    pub(in crate::client) headers: CallHeaders,
    pub(in crate::client) body: Option<Value>,
}

impl RequestConfig {
    /// The path appended to the base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The query parameters.
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// The request headers.
    pub fn headers(&self) -> &CallHeaders {
        &self.headers
    }

    /// The request body, if any.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Checks whether nothing has been configured since the last dispatch.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
            && self.params.is_empty()
            && self.headers.is_empty()
            && self.body.is_none()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_default_config_is_empty() {
        assert!(RequestConfig::default().is_empty());
    }

    #[test]
    fn test_config_with_body_is_not_empty() {
        let config = RequestConfig {
            body: Some(json!({})),
            ..RequestConfig::default()
        };

        assert!(!config.is_empty());
        assert_eq!(config.body(), Some(&json!({})));
    }
}
