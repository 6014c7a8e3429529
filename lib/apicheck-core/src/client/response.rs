use std::str;

use bytes::Bytes;
use headers::{ContentType, HeaderMapExt};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;
use url::Url;

use super::ApiClientError;

/// Placeholder logged when a response body cannot be read or decoded.
pub const UNREADABLE_BODY: &str = "[unreadable body]";

/// A response returned by a successful dispatch.
///
/// The body is buffered once when the response is received. The client uses
/// its own parse of those bytes for logging only; what you read here is the
/// untouched body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    url: Url,
    headers: HeaderMap,
    body: ResponseBody,
}

#[derive(Debug, Clone)]
enum ResponseBody {
    Bytes(Bytes),
    Unreadable(String),
}

impl ApiResponse {
    pub(in crate::client) async fn read(response: reqwest::Response) -> Self {
        let status = response.status();
        let url = response.url().clone();
        let headers = response.headers().clone();
        let body = match response.bytes().await {
            Ok(bytes) => ResponseBody::Bytes(bytes),
            Err(error) => {
                warn!(?error, %url, "unable to read response body");
                ResponseBody::Unreadable(error.to_string())
            }
        };

        Self {
            status,
            url,
            headers,
            body,
        }
    }

    /// Body as logged: JSON when it parses, text otherwise, a placeholder as a last resort.
    pub(in crate::client) fn logged_body(&self) -> Value {
        let ResponseBody::Bytes(bytes) = &self.body else {
            return Value::String(UNREADABLE_BODY.to_string());
        };
        serde_json::from_slice(bytes)
            .or_else(|_| str::from_utf8(bytes).map(|text| Value::String(text.to_string())))
            .unwrap_or_else(|_| Value::String(UNREADABLE_BODY.to_string()))
    }

    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Checks whether the status is in the `2xx` range.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The final URL of the response.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Looks a header up by name; values that are not visible ASCII are skipped.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    /// The parsed `Content-Type` header, if any.
    pub fn content_type(&self) -> Option<ContentType> {
        self.headers.typed_get::<ContentType>()
    }

    /// The raw body bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::UnreadableBody`] when the transport failed to deliver the body.
    pub fn bytes(&self) -> Result<&Bytes, ApiClientError> {
        match &self.body {
            ResponseBody::Bytes(bytes) => Ok(bytes),
            ResponseBody::Unreadable(message) => Err(ApiClientError::UnreadableBody {
                message: message.clone(),
            }),
        }
    }

    /// The body as text; invalid UTF-8 sequences are replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::UnreadableBody`] when the transport failed to deliver the body.
    pub fn text(&self) -> Result<String, ApiClientError> {
        let bytes = self.bytes()?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Json`] with the path of the failure when the
    /// body does not match `T`.
    pub fn json<T>(&self) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        let bytes = self.bytes()?;
        let deserializer = &mut serde_json::Deserializer::from_slice(bytes);
        serde_path_to_error::deserialize(deserializer).map_err(|err| ApiClientError::Json {
            path: err.path().to_string(),
            error: err.into_inner(),
            body: String::from_utf8_lossy(bytes).into_owned(),
        })
    }

    /// Deserializes the body as an untyped JSON value.
    ///
    /// # Errors
    ///
    /// Same as [`ApiResponse::json`].
    pub fn json_value(&self) -> Result<Value, ApiClientError> {
        self.json()
    }
}
