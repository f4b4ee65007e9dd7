use connector_core::{ConnectorConfig, RetryPolicy, UmbrellaClient, UmbrellaConnector};

use std::time::Duration;

use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-api-key";
pub const KEY_SECRET: &str = "test-key-secret";
pub const TOKEN_PATH: &str = "/auth/v2/token";
pub const USERS_PATH: &str = "/admin/v2/users";
pub const ROLES_PATH: &str = "/admin/v2/roles";

/// Retry timing short enough for tests, same attempt budget as production.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(10))
}

pub fn config_for(server: &MockServer) -> ConnectorConfig {
    ConnectorConfig::new(API_KEY, KEY_SECRET)
        .expect("test credentials are valid")
        .with_base_url(Url::parse(&server.uri()).expect("mock server uri is a URL"))
}

pub fn client_for(server: &MockServer) -> UmbrellaClient {
    UmbrellaClient::new(&config_for(server))
        .expect("client builds")
        .with_retry_policy(fast_retry())
}

pub fn connector_for(server: &MockServer) -> UmbrellaConnector {
    UmbrellaConnector::from_client(client_for(server))
}

pub fn token_body(token: &str) -> Value {
    json!({"access_token": token, "token_type": "bearer", "expires_in": 3600})
}

/// Token endpoint that always hands out `token`, checked for basic auth.
pub async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(basic_auth(API_KEY, KEY_SECRET))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(token)))
        .mount(server)
        .await;
}

pub fn user_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "firstname": "User",
        "lastname": format!("Number{id}"),
        "email": format!("user{id}@example.com"),
        "role": "Read Only",
        "roleId": 2,
        "status": status,
        "twoFactorEnable": false,
        "timezone": "UTC",
        "lastLoginTime": "2023-05-01T08:00:00.000Z"
    })
}

/// Requests the server saw, minus token acquisition.
pub async fn api_requests(server: &MockServer) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() != TOKEN_PATH)
        .collect()
}

pub async fn token_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == TOKEN_PATH)
        .count()
}
