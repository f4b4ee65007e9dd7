use crate::helpers::parse_lines;

use umbrella::cli::{Command, run};
use umbrella::error::AppError;
use umbrella::handlers::{ConfigSource, HandlerContext};

use connector_core::ErrorKind;
use connector_core::config::{API_KEY_ENV, BASE_URL_ENV, KEY_SECRET_ENV, PAGE_SIZE_ENV};

use serde_json::json;
use serial_test::serial;
use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn clear_env() {
    // SAFETY: tests touching the environment run under #[serial]
    unsafe {
        for name in [API_KEY_ENV, KEY_SECRET_ENV, PAGE_SIZE_ENV, BASE_URL_ENV] {
            std::env::remove_var(name);
        }
    }
}

#[tokio::test]
#[serial]
async fn given_env_credentials_when_test_connection_then_basic_auth_uses_them() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v2/token"))
        .and(basic_auth("env-key", "env-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "t"})))
        .expect(1)
        .mount(&server)
        .await;
    clear_env();
    // SAFETY: serialized
    unsafe {
        std::env::set_var(API_KEY_ENV, "env-key");
        std::env::set_var(KEY_SECRET_ENV, "env-secret");
        std::env::set_var(BASE_URL_ENV, server.uri());
    }
    let context = HandlerContext::new(ConfigSource::Environment);

    // WHEN
    let mut out = Vec::new();
    let result = run(&Command::TestConnection, &context, &mut out).await;
    clear_env();

    // THEN
    assert_eq!(result.unwrap(), 1);
    assert_eq!(parse_lines(&out), vec![json!({})]);
}

#[tokio::test]
#[serial]
async fn given_no_api_key_in_env_when_running_then_invalid_configuration() {
    // GIVEN
    clear_env();
    let context = HandlerContext::new(ConfigSource::Environment);

    // WHEN
    let mut out = Vec::new();
    let result = run(&Command::ListAccounts, &context, &mut out).await;

    // THEN
    match result {
        Err(AppError::Connector(e)) => {
            assert_eq!(e.kind(), ErrorKind::InvalidConfiguration);
            assert_eq!(e.message(), "'apiKey' is required");
        }
        other => panic!("expected connector error, got: {other:?}"),
    }
    assert!(out.is_empty());
}
