#![allow(missing_docs)]

use apicheck_core::{ApiClient, ApiClientError, LogEntry, QueryParams};
use rstest::rstest;
use serde_json::{Value, json};
use tracing::info;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
pub use self::common::*;

#[rstest]
#[tokio::test]
async fn test_get_articles_with_pagination(#[future] server: MockServer) -> anyhow::Result<()> {
    let server = server.await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("limit", "10"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "articles": [{ "slug": "hello", "title": "Hello" }],
            "articlesCount": 1
        })))
        .expect(1)
        .mount(&server)
        .await;
    let mut api = client_for(&server);

    let response = api
        .with_path("/articles")
        .with_params([("limit", 10), ("offset", 0)])
        .get()
        .await?;

    assert_eq!(response.status(), 200);
    let body = response.json_value()?;
    let count = body["articlesCount"].as_u64().unwrap_or(u64::MAX);
    assert!(count <= 10, "got {count} articles");
    assert!(api.pending().is_empty());
    assert_eq!(api.logger().len(), 2);

    info!("logs:\n{}", api.logs());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_failure_status_carries_logs(#[future] server: MockServer) -> anyhow::Result<()> {
    let server = server.await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": { "email": ["has already been taken"] }
        })))
        .mount(&server)
        .await;
    let mut api = client_for(&server);

    let result = api
        .with_path("/users")
        .with_body(json!({ "user": { "email": "taken@example.com" } }))
        .post()
        .await;

    let Err(error) = result else {
        anyhow::bail!("expected a request failure");
    };
    assert!(matches!(error, ApiClientError::RequestFailed { .. }));
    assert_eq!(error.code(), Some(422));

    let message = error.to_string();
    assert!(message.starts_with("Request failed with status 422"));
    assert!(message.contains("=== Request Details ==="));
    assert!(message.contains("=== Response Details ==="));
    assert!(message.contains("has already been taken"));

    assert_eq!(api.logger().len(), 2);
    assert!(matches!(
        api.logger().entries(),
        [LogEntry::Request(_), LogEntry::Response(response)] if response.status_code == 422
    ));
    assert!(api.pending().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_base_url_is_a_configuration_error() {
    init_tracing();
    let mut api = ApiClient::builder().build();

    let result = api
        .with_path("/tags")
        .with_params([("limit", 1)])
        .get()
        .await;

    assert!(matches!(result, Err(ApiClientError::Configuration { .. })));
    assert!(api.logger().is_empty());
    assert!(api.pending().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_null_params_are_omitted(#[future] server: MockServer) -> anyhow::Result<()> {
    let server = server.await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "articles": [] })))
        .mount(&server)
        .await;
    let mut api = client_for(&server);

    api.with_path("/articles")
        .with_params(
            QueryParams::new()
                .add_param("tag", Value::Null)
                .add_param("limit", 5)
                .add_param("author", "jake smith"),
        )
        .get()
        .await?;

    let requests = server.received_requests().await.unwrap_or_default();
    let [request] = requests.as_slice() else {
        anyhow::bail!("expected one request, got {}", requests.len());
    };
    assert_eq!(request.url.query(), Some("limit=5&author=jake+smith"));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_headers_are_replaced_not_merged(#[future] server: MockServer) -> anyhow::Result<()> {
    let server = server.await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .and(header("x-second", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tags": [] })))
        .expect(1)
        .mount(&server)
        .await;
    let mut api = client_for(&server);

    api.with_path("/tags")
        .with_headers([("X-First", "1")])
        .with_headers([("X-Second", "2")])
        .get()
        .await?;

    let requests = server.received_requests().await.unwrap_or_default();
    let [request] = requests.as_slice() else {
        anyhow::bail!("expected one request, got {}", requests.len());
    };
    assert!(request.headers.get("x-first").is_none());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_get_never_sends_a_body(#[future] server: MockServer) -> anyhow::Result<()> {
    let server = server.await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tags": [] })))
        .mount(&server)
        .await;
    let mut api = client_for(&server);

    api.with_path("/tags")
        .with_body(json!({ "ignored": true }))
        .get()
        .await?;

    let requests = server.received_requests().await.unwrap_or_default();
    let [request] = requests.as_slice() else {
        anyhow::bail!("expected one request, got {}", requests.len());
    };
    assert!(request.body.is_empty());
    assert!(request.headers.get("content-type").is_none());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_post_and_put_send_json(#[future] server: MockServer) -> anyhow::Result<()> {
    let server = server.await;
    let article = json!({ "article": { "title": "Hello", "body": "World" } });
    for verb in ["POST", "PUT"] {
        Mock::given(method(verb))
            .and(path("/api/articles/hello"))
            .and(header("content-type", "application/json"))
            .and(body_json(&article))
            .respond_with(ResponseTemplate::new(200).set_body_json(&article))
            .expect(1)
            .mount(&server)
            .await;
    }
    let mut api = client_for(&server);

    let created = api
        .with_path("/articles/hello")
        .with_body(article.clone())
        .post()
        .await?;
    let updated = api
        .with_path("/articles/hello")
        .with_body(article.clone())
        .put()
        .await?;

    assert_eq!(created.json_value()?, article);
    assert_eq!(updated.json_value()?, article);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_delete_with_empty_response(#[future] server: MockServer) -> anyhow::Result<()> {
    let server = server.await;
    Mock::given(method("DELETE"))
        .and(path("/api/articles/hello"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let mut api = client_for(&server);

    let response = api.with_path("/articles/hello").delete().await?;

    assert_eq!(response.status(), 204);
    assert_eq!(response.text()?, "");
    assert!(matches!(
        api.logger().entries(),
        [_, LogEntry::Response(logged)] if logged.body == json!("")
    ));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_text_body_is_logged_as_string(#[future] server: MockServer) -> anyhow::Result<()> {
    let server = server.await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;
    let mut api = client_for(&server);

    let error = api
        .with_path("/health")
        .get()
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("500 should fail"))?;

    assert_eq!(error.code(), Some(500));
    assert!(
        error
            .logs()
            .is_some_and(|logs| logs.contains(r#""body": "Internal Server Error""#))
    );
    Ok(())
}

#[rstest]
#[tokio::test]
async fn test_response_body_is_untouched(#[future] server: MockServer) -> anyhow::Result<()> {
    let server = server.await;
    let raw = r#"{ "tags" : [ "rust" ] }"#;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_string(raw))
        .mount(&server)
        .await;
    let mut api = client_for(&server);

    let response = api.with_path("/tags").get().await?;

    assert_eq!(response.text()?, raw);
    assert!(matches!(
        api.logger().entries(),
        [_, LogEntry::Response(logged)] if logged.body == json!({ "tags": ["rust"] })
    ));
    Ok(())
}

#[tokio::test]
async fn test_transport_failure_is_unexpected() {
    init_tracing();
    let mut api = ApiClient::builder().build();

    let result = api.with_url("http://127.0.0.1:1").with_path("/tags").get().await;

    let Err(error) = result else {
        panic!("nothing listens on port 1");
    };
    assert!(matches!(error, ApiClientError::Unexpected { .. }));
    assert!(error.to_string().starts_with("Unexpected error: "));
    // the request was logged, no response
    assert!(matches!(api.logger().entries(), [LogEntry::Request(_)]));
    assert!(error.logs().is_some_and(|logs| logs.contains("=== Request Details ===")));
    assert!(api.pending().is_empty());
}

#[tokio::test]
async fn test_https_reaches_the_transport() {
    init_tracing();
    let mut api = ApiClient::builder().build();

    let result = api.with_url("https://127.0.0.1:1").with_path("/tags").get().await;

    let Err(error) = result else {
        panic!("nothing listens on port 1");
    };
    let message = error.to_string();
    assert!(matches!(error, ApiClientError::Unexpected { .. }));
    assert!(!message.contains("scheme is not http"), "{message}");
    assert!(message.contains("https://127.0.0.1:1/tags"));
}

#[rstest]
#[tokio::test]
async fn test_base_url_persists_across_calls(#[future] server: MockServer) -> anyhow::Result<()> {
    let server = server.await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tags": [] })))
        .expect(2)
        .mount(&server)
        .await;
    let mut api = ApiClient::builder().build();

    api.with_url(api_url(&server)).with_path("/tags").get().await?;
    api.with_path("/tags").get().await?;

    assert_eq!(api.logger().len(), 4);
    Ok(())
}
