// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use httpmock::Method::POST;
use httpmock::{Mock, MockServer};

use crate::{ClientConfig, RapidClient};

pub const MOCK_KEY: &str = "mockKey";
pub const MOCK_SECRET: &str = "mockSecret";
/// base64("mockKey:mockSecret")
pub const MOCK_BASIC_AUTH: &str = "Basic bW9ja0tleTptb2NrU2VjcmV0";

pub fn mock_token_response() -> serde_json::Value {
    json!({
        "access_token": "mockAccessToken",
        "expires_in": 3600,
        "token_type": "Bearer",
        "refresh_token": "mockRefreshToken"
    })
}

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn mock_config(base_url: &str) -> ClientConfig {
    ClientConfig::new(base_url, MOCK_KEY, MOCK_SECRET).with_timeout_seconds(5)
}

pub fn mock_client(server: &MockServer) -> RapidClient {
    RapidClient::new(&mock_config(&server.base_url())).expect("client")
}

/// `/token` answering any POST with the standard mock token.
pub async fn mock_token_endpoint(server: &MockServer) -> Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(mock_token_response());
        })
        .await
}
