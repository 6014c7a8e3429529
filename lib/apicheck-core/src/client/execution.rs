use std::mem;

use headers::{ContentType, HeaderMapExt};
use http::Method;
use reqwest::{Body, Request};
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use super::{ApiClient, ApiClientError, ApiResponse, RequestConfig};

impl ApiClient {
    /// Runs one call with the pending configuration.
    ///
    /// The configuration is moved out before anything else happens, so once dispatch
    /// has started the client is back to an empty configuration on every exit path,
    /// including when the returned future is dropped before completion.
    pub(super) async fn dispatch(&mut self, method: Method) -> Result<ApiResponse, ApiClientError> {
        let request = mem::take(&mut self.request);

        let url = match self.resolve_url(&request) {
            Ok(url) => url,
            Err(error) => {
                warn!(%error, %method, "invalid request configuration");
                return Err(error.with_logs(self.logger.recent_logs()));
            }
        };

        self.logger
            .log_request(&method, url.as_str(), &request.headers, request.body.as_ref());

        let result = self.exchange(method, url, &request).await;
        result.map_err(|error| error.with_logs(self.logger.recent_logs()))
    }

    async fn exchange(
        &mut self,
        method: Method,
        url: Url,
        request: &RequestConfig,
    ) -> Result<ApiResponse, ApiClientError> {
        let http_request = Self::build_request(method, url, request)?;

        debug!(?http_request, "sending...");
        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(|error| ApiClientError::unexpected(&error))?;
        debug!(?response, "...receiving");

        let response = ApiResponse::read(response).await;
        self.logger
            .log_response(response.status(), response.logged_body());

        if !response.is_success() {
            let status = response.status();
            warn!(%status, url = %response.url(), "request failed");
            return Err(ApiClientError::RequestFailed {
                status,
                logs: String::new(),
            });
        }

        Ok(response)
    }

    /// `base URL + path`, then the non-null query parameters.
    pub(super) fn resolve_url(&self, request: &RequestConfig) -> Result<Url, ApiClientError> {
        let Some(base) = self.base_url() else {
            return Err(ApiClientError::configuration(
                "Base URL not configured. Call `with_url(..)` or set a default base URL on the builder.",
                json!({ "baseUrlProvided": false }),
            ));
        };

        let mut url = format!("{base}{}", request.path)
            .parse::<Url>()
            .map_err(|error| {
                ApiClientError::configuration(
                    "Invalid URL constructed",
                    json!({
                        "base": base,
                        "path": request.path,
                        "originalError": error.to_string(),
                    }),
                )
            })?;

        request.params.append_to(&mut url)?;
        Ok(url)
    }

    pub(super) fn build_request(
        method: Method,
        url: Url,
        request: &RequestConfig,
    ) -> Result<Request, ApiClientError> {
        let sends_body = matches!(method, Method::POST | Method::PUT);
        let mut http_request = Request::new(method, url);

        if let Some(body) = request.body.as_ref().filter(|_| sends_body) {
            let data = serde_json::to_vec(body).map_err(|error| ApiClientError::unexpected(&error))?;
            http_request.headers_mut().typed_insert(ContentType::json());
            *http_request.body_mut() = Some(Body::from(data));
        }

        // Explicit headers win over the body content type
        let req_headers = http_request.headers_mut();
        for (name, value) in request.headers.to_http_headers()? {
            req_headers.insert(name, value);
        }

        Ok(http_request)
    }
}
