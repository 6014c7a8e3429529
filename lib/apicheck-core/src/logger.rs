//! In-memory request/response log.
//!
//! An [`ApiLogger`] records what one [`ApiClient`](crate::ApiClient) sent and
//! received, so a failing call can be diagnosed from a single error report.
//! It is owned by the client it serves: nothing is global, nothing expires,
//! and only [`ApiLogger::clear_logs`] empties it.

use std::fmt::Debug;

use http::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::CallHeaders;

/// The outbound side of a call, as logged before sending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestLog {
    /// HTTP method.
    pub method: String,
    /// Fully resolved URL, query included.
    pub url: String,
    /// Request headers.
    pub headers: CallHeaders,
    /// Request body, `null` when none was configured.
    pub body: Value,
}

/// The inbound side of a call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseLog {
    /// HTTP status code.
    pub status_code: u16,
    /// Response body: parsed JSON, plain text, or a placeholder when unreadable.
    pub body: Value,
}

/// One record of the log.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEntry {
    /// A request about to be sent.
    Request(RequestLog),
    /// A response received.
    Response(ResponseLog),
}

impl LogEntry {
    fn title(&self) -> &'static str {
        match self {
            Self::Request(_) => "Request Details",
            Self::Response(_) => "Response Details",
        }
    }

    fn render(&self) -> String {
        let data = match self {
            Self::Request(request) => to_pretty_json(request),
            Self::Response(response) => to_pretty_json(response),
        };
        format!("=== {} ===\n{data}", self.title())
    }
}

/// Replacement for redacted values in the log.
pub const REDACTED: &str = "[REDACTED]";

/// Append-only record of request/response pairs.
///
/// # Example
///
/// ```rust
/// use apicheck_core::{ApiLogger, CallHeaders};
/// use http::{Method, StatusCode};
/// use serde_json::json;
///
/// let mut logger = ApiLogger::new();
/// logger.log_request(&Method::GET, "https://api.example.com/tags", &CallHeaders::new(), None);
/// logger.log_response(StatusCode::OK, json!({ "tags": ["rust"] }));
///
/// let logs = logger.recent_logs();
/// assert!(logs.starts_with("=== Request Details ==="));
///
/// logger.clear_logs();
/// assert_eq!(logger.recent_logs(), "");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ApiLogger {
    entries: Vec<LogEntry>,
    redacted_fields: Vec<String>,
}

impl ApiLogger {
    /// Creates an empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Masks these request header names and body keys (at any depth) with [`REDACTED`].
    ///
    /// Names are matched ignoring ASCII case. Only the log is affected, the
    /// request itself is sent as configured.
    ///
    /// ```rust
    /// use apicheck_core::{ApiLogger, CallHeaders};
    /// use http::Method;
    /// use serde_json::json;
    ///
    /// let mut logger = ApiLogger::new().with_redacted_fields(["password"]);
    /// let body = json!({ "user": { "email": "a@b.com", "password": "hunter2" } });
    /// logger.log_request(&Method::POST, "https://api.example.com/users/login", &CallHeaders::new(), Some(&body));
    ///
    /// assert!(!logger.recent_logs().contains("hunter2"));
    /// ```
    #[must_use]
    pub fn with_redacted_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.redacted_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Appends a request entry.
    pub fn log_request(
        &mut self,
        method: &Method,
        url: &str,
        headers: &CallHeaders,
        body: Option<&Value>,
    ) {
        let headers = headers
            .iter()
            .map(|(name, value)| (name, if self.is_redacted(name) { REDACTED } else { value }))
            .collect();
        let mut body = body.cloned().unwrap_or(Value::Null);
        self.redact(&mut body);

        self.entries.push(LogEntry::Request(RequestLog {
            method: method.to_string(),
            url: url.to_string(),
            headers,
            body,
        }));
    }

    fn is_redacted(&self, name: &str) -> bool {
        self.redacted_fields
            .iter()
            .any(|field| field.eq_ignore_ascii_case(name))
    }

    fn redact(&self, value: &mut Value) {
        if self.redacted_fields.is_empty() {
            return;
        }
        match value {
            Value::Object(map) => {
                for (key, item) in map.iter_mut() {
                    if self.is_redacted(key) {
                        *item = Value::String(REDACTED.to_string());
                    } else {
                        self.redact(item);
                    }
                }
            }
            Value::Array(items) => items.iter_mut().for_each(|item| self.redact(item)),
            _ => {}
        }
    }

    /// Appends a response entry.
    pub fn log_response(&mut self, status: StatusCode, body: Value) {
        self.entries.push(LogEntry::Response(ResponseLog {
            status_code: status.as_u16(),
            body,
        }));
    }

    /// Renders every entry, in insertion order, separated by a blank line.
    ///
    /// Returns an empty string when there is nothing to render.
    pub fn recent_logs(&self) -> String {
        self.entries
            .iter()
            .map(LogEntry::render)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Removes every entry.
    pub fn clear_logs(&mut self) {
        self.entries.clear();
    }

    /// The raw entries.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pretty-prints JSON with a four-space indent.
pub(crate) fn to_pretty_json<T>(value: &T) -> String
where
    T: Serialize + Debug,
{
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    match value.serialize(&mut serializer) {
        Ok(()) => String::from_utf8_lossy(&buffer).into_owned(),
        Err(_) => format!("{value:?}"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_new_logger_renders_nothing() {
        let logger = ApiLogger::new();

        assert!(logger.is_empty());
        assert_eq!(logger.recent_logs(), "");
    }

    #[test]
    fn test_request_then_response_render_in_order() {
        let mut logger = ApiLogger::new();
        let headers = CallHeaders::new().add_header("Accept", "application/json");

        logger.log_request(&Method::GET, "https://api.example.com/users", &headers, None);
        logger.log_response(
            StatusCode::OK,
            json!({ "users": [{ "id": 1, "name": "Alice" }] }),
        );

        insta::assert_snapshot!(logger.recent_logs(), @r#"
        === Request Details ===
        {
            "method": "GET",
            "url": "https://api.example.com/users",
            "headers": {
                "Accept": "application/json"
            },
            "body": null
        }

        === Response Details ===
        {
            "statusCode": 200,
            "body": {
                "users": [
                    {
                        "id": 1,
                        "name": "Alice"
                    }
                ]
            }
        }
        "#);
    }

    #[test]
    fn test_redacted_fields_are_masked_at_any_depth() {
        let mut logger = ApiLogger::new().with_redacted_fields(["password", "Authorization"]);
        let headers = CallHeaders::new().add_header("authorization", "Token abc123");
        let body = json!({
            "user": { "email": "a@b.com", "password": "hunter2" },
            "history": [{ "PASSWORD": "old-secret" }]
        });

        logger.log_request(&Method::POST, "https://api.example.com/users", &headers, Some(&body));

        let logs = logger.recent_logs();
        assert!(!logs.contains("hunter2"));
        assert!(!logs.contains("old-secret"));
        assert!(!logs.contains("abc123"));
        assert!(logs.contains(r#""email": "a@b.com""#));
        assert!(logs.contains(r#""password": "[REDACTED]""#));
    }

    #[test]
    fn test_recent_logs_has_no_side_effect() {
        let mut logger = ApiLogger::new();
        logger.log_response(StatusCode::NO_CONTENT, Value::String(String::new()));

        let first = logger.recent_logs();
        let second = logger.recent_logs();

        assert_eq!(first, second);
        assert_eq!(logger.len(), 1);
    }

    #[test]
    fn test_clear_logs_empties_the_log() {
        let mut logger = ApiLogger::new();
        logger.log_request(&Method::POST, "https://api.example.com", &CallHeaders::new(), Some(&json!({})));
        logger.log_response(StatusCode::CREATED, json!({}));

        logger.clear_logs();

        assert!(logger.entries().is_empty());
        assert_eq!(logger.recent_logs(), "");
    }

    #[test]
    fn test_entries_keep_call_order() {
        let mut logger = ApiLogger::new();
        logger.log_request(&Method::DELETE, "https://api.example.com/a", &CallHeaders::new(), None);
        logger.log_response(StatusCode::OK, Value::Null);
        logger.log_request(&Method::GET, "https://api.example.com/b", &CallHeaders::new(), None);

        let urls: Vec<_> = logger
            .entries()
            .iter()
            .filter_map(|entry| match entry {
                LogEntry::Request(request) => Some(request.url.as_str()),
                LogEntry::Response(_) => None,
            })
            .collect();
        assert_eq!(urls, vec!["https://api.example.com/a", "https://api.example.com/b"]);
    }
}
