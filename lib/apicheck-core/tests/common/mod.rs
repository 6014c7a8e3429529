#![allow(dead_code)]

use apicheck_core::ApiClient;
use rstest::fixture;
use tracing::info;
use wiremock::MockServer;

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

/// A mock of the remote API.
#[fixture]
pub async fn server() -> MockServer {
    init_tracing();
    MockServer::start().await
}

/// Base URL of the mocked API, `/api` included.
pub fn api_url(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

/// A client whose default base URL targets the mocked API.
pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::builder().with_base_url(api_url(server)).build()
}
