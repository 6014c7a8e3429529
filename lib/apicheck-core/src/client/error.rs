use std::error::Error;

use http::StatusCode;
use serde_json::{Map, Value};

/// Errors raised by the [`ApiClient`](crate::ApiClient) and by [`ApiResponse`](crate::ApiResponse) accessors.
///
/// The first three variants split "the framework was misused or broke" from
/// "the API answered with a failure", so a test can assert on HTTP semantics
/// without ever mistaking one for the other. Each of them carries the request/response
/// log accumulated by the client at the time of failure.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum ApiClientError {
    /// No base URL is available, or the URL built from base, path and query is invalid.
    ///
    /// Raised before any network call; nothing is logged for the failing call.
    #[display("{message}")]
    Configuration {
        /// What went wrong.
        message: String,
        /// Structured details (base, path, offending parameter, ...).
        context: Map<String, Value>,
        /// Log snapshot at the time of failure.
        logs: String,
    },

    /// The API answered with a non-success status code.
    #[display("Request failed with status {}\n\nLogs:\n{logs}", status.as_u16())]
    RequestFailed {
        /// The status code returned by the API.
        status: StatusCode,
        /// Log snapshot, including the request and the response of the failing call.
        logs: String,
    },

    /// Anything else that broke while sending: transport failure, timeout, invalid header.
    #[display("Unexpected error: {message}\n\nLogs:\n{logs}")]
    Unexpected {
        /// The original error message, with its source chain.
        message: String,
        /// Log snapshot at the time of failure.
        logs: String,
    },

    /// JSON response deserialization failure.
    #[display("Failed to deserialize JSON at '{path}': {error}\n{body}")]
    Json {
        /// Path inside the document where deserialization stopped.
        path: String,
        /// The underlying JSON error.
        error: serde_json::Error,
        /// The response body that failed to parse.
        body: String,
    },

    /// The response body could not be read from the transport.
    #[display("Response body could not be read: {message}")]
    UnreadableBody {
        /// The transport error message.
        message: String,
    },
}

impl ApiClientError {
    pub(in crate::client) fn configuration(message: impl Into<String>, context: Value) -> Self {
        let context = match context {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => Map::from_iter([("value".to_string(), other)]),
        };
        Self::Configuration {
            message: message.into(),
            context,
            logs: String::new(),
        }
    }

    pub(in crate::client) fn unexpected(error: &(dyn Error + 'static)) -> Self {
        Self::Unexpected {
            message: error_chain(error),
            logs: String::new(),
        }
    }

    /// Replaces the log snapshot carried by the error.
    pub(in crate::client) fn with_logs(mut self, snapshot: String) -> Self {
        match &mut self {
            Self::Configuration { logs, .. }
            | Self::RequestFailed { logs, .. }
            | Self::Unexpected { logs, .. } => *logs = snapshot,
            Self::Json { .. } | Self::UnreadableBody { .. } => {}
        }
        self
    }

    /// The HTTP status code, when the API answered with a failure.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(status.as_u16()),
            _ => None,
        }
    }

    /// The structured context of a configuration error.
    pub fn context(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }

    /// The request/response log captured when the error was raised.
    pub fn logs(&self) -> Option<&str> {
        match self {
            Self::Configuration { logs, .. }
            | Self::RequestFailed { logs, .. }
            | Self::Unexpected { logs, .. } => Some(logs),
            Self::Json { .. } | Self::UnreadableBody { .. } => None,
        }
    }
}

fn error_chain(error: &(dyn Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
