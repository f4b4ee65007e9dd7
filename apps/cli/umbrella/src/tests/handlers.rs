use crate::error::AppError;
use crate::handlers::{ConfigSource, HandlerContext, log_and_rethrow, masked_plan};

use common::ErrorLocation;

use connector_core::{ConnectorError, ErrorKind};

use models::AccountCreateInput;

use std::error::Error;
use std::panic::Location;
use std::path::PathBuf;

use serde_json::{Map, json};

// ============================================================================
// log_and_rethrow
// ============================================================================

/// **VALUE**: Verifies classified connector errors cross the handler boundary untouched.
///
/// **WHY THIS MATTERS**: The platform decides how to react from the error kind.
/// Rewrapping an InvalidConfiguration as Generic would hide a credential problem.
#[test]
fn given_connector_error_when_rethrown_then_same_kind_and_message() {
    // GIVEN
    let err = AppError::from(ConnectorError::invalid_configuration("401 Unauthorized"));

    // WHEN
    let rethrown = log_and_rethrow(err, "Test Connection Failed.");

    // THEN
    assert_eq!(rethrown.kind(), ErrorKind::InvalidConfiguration);
    assert_eq!(rethrown.message(), "401 Unauthorized");
}

/// **VALUE**: Verifies other failures are wrapped with context and keep their cause.
///
/// **BUG THIS CATCHES**: Would catch the original error being dropped instead of
/// chained as the source.
#[test]
fn given_other_error_when_rethrown_then_generic_with_context_and_source() {
    // GIVEN
    let err = AppError::Output {
        message: String::from("Failed to write output: pipe closed"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN
    let rethrown = log_and_rethrow(err, "Account aggregation failed.");

    // THEN
    assert_eq!(rethrown.kind(), ErrorKind::Generic);
    assert_eq!(
        rethrown.message(),
        "Account aggregation failed. Failed to write output: pipe closed"
    );
    let source = rethrown.source().expect("original error kept");
    assert!(source.downcast_ref::<AppError>().is_some());
}

// ============================================================================
// masked_plan
// ============================================================================

#[test]
fn given_plan_with_password_when_masked_then_password_hidden_rest_intact() {
    // GIVEN
    let mut attributes = Map::new();
    attributes.insert("email".into(), json!("ada@example.com"));
    attributes.insert("password".into(), json!("hunter2"));
    let input = AccountCreateInput {
        identity: Some(String::from("ada")),
        attributes,
    };

    // WHEN
    let plan = masked_plan(&input);

    // THEN
    assert_eq!(plan["attributes"]["password"], json!("****"));
    assert_eq!(plan["attributes"]["email"], json!("ada@example.com"));
    assert_eq!(plan["identity"], json!("ada"));
    assert!(!plan.to_string().contains("hunter2"));
}

#[test]
fn given_plan_without_password_when_masked_then_no_password_added() {
    let input = AccountCreateInput::default();

    let plan = masked_plan(&input);

    assert!(plan["attributes"].get("password").is_none());
}

// ============================================================================
// HandlerContext
// ============================================================================

#[tokio::test]
async fn given_missing_config_file_when_getting_connector_then_config_error() {
    // GIVEN
    let dir = tempfile::tempdir().unwrap();
    let context = HandlerContext::new(ConfigSource::File(dir.path().join("absent.json")));

    // WHEN
    let result = context.connector().await;

    // THEN
    assert!(matches!(result, Err(AppError::Config { .. })));
}

#[tokio::test]
async fn given_config_without_secret_when_getting_connector_then_invalid_configuration() {
    // GIVEN
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join("config.json");
    std::fs::write(&path, r#"{"apiKey":"k"}"#).unwrap();
    let context = HandlerContext::new(ConfigSource::File(path));

    // WHEN
    let result = context.connector().await;

    // THEN
    match result {
        Err(AppError::Connector(e)) => {
            assert_eq!(e.kind(), ErrorKind::InvalidConfiguration);
            assert_eq!(e.message(), "'keySecret' is required");
        }
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("config without keySecret must not build a connector"),
    }
}

#[tokio::test]
async fn given_valid_config_when_getting_connector_twice_then_same_instance() {
    // GIVEN
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"apiKey":"k","keySecret":"s"}"#).unwrap();
    let context = HandlerContext::new(ConfigSource::File(path));

    // WHEN
    let first = context.connector().await.unwrap() as *const _;
    let second = context.connector().await.unwrap() as *const _;

    // THEN
    assert_eq!(first, second);
}
