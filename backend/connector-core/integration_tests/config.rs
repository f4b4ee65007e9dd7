use connector_core::config::{
    API_KEY_ENV, BASE_URL_ENV, DEFAULT_PAGE_SIZE, KEY_SECRET_ENV, PAGE_SIZE_ENV,
};
use connector_core::{ErrorKind, RawConnectorConfig, UMBRELLA_BASE_URL};

use std::io::Write;

use serial_test::serial;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

fn clear_env() {
    // SAFETY: every test touching these variables runs under #[serial]
    unsafe {
        for name in [API_KEY_ENV, KEY_SECRET_ENV, PAGE_SIZE_ENV, BASE_URL_ENV] {
            std::env::remove_var(name);
        }
    }
}

// ============================================================================
// File config
// ============================================================================

#[test]
fn given_complete_json_when_loading_then_validates_with_defaults() {
    // GIVEN
    let file = write_config(r#"{"apiKey": "key-1", "keySecret": "secret-1"}"#);

    // WHEN
    let config = RawConnectorConfig::from_file(file.path())
        .unwrap()
        .validate()
        .unwrap();

    // THEN
    assert_eq!(config.api_key.expose(), "key-1");
    assert_eq!(config.key_secret.expose(), "secret-1");
    assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(config.base_url.as_str(), format!("{UMBRELLA_BASE_URL}/"));
}

#[test]
fn given_page_size_and_base_url_when_loading_then_overrides_apply() {
    let file = write_config(
        r#"{"apiKey": "k", "keySecret": "s", "pageSize": 25, "baseUrl": "http://localhost:9000"}"#,
    );

    let config = RawConnectorConfig::from_file(file.path())
        .unwrap()
        .validate()
        .unwrap();

    assert_eq!(config.page_size, 25);
    assert_eq!(config.base_url.as_str(), "http://localhost:9000/");
}

/// **VALUE**: Verifies a missing key secret is reported by its config key name.
///
/// **WHY THIS MATTERS**: Operators fix configuration by key name; a generic
/// "invalid config" sends them hunting.
#[test]
fn given_missing_key_secret_when_validating_then_invalid_configuration() {
    // GIVEN
    let file = write_config(r#"{"apiKey": "k"}"#);

    // WHEN
    let err = RawConnectorConfig::from_file(file.path())
        .unwrap()
        .validate()
        .unwrap_err();

    // THEN
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    assert_eq!(err.message(), "'keySecret' is required");
}

#[test]
fn given_blank_api_key_when_validating_then_invalid_configuration() {
    let file = write_config(r#"{"apiKey": "   ", "keySecret": "s"}"#);

    let err = RawConnectorConfig::from_file(file.path())
        .unwrap()
        .validate()
        .unwrap_err();

    assert_eq!(err.message(), "'apiKey' is required");
}

#[test]
fn given_malformed_json_when_loading_then_parse_error_names_file() {
    let file = write_config("{ apiKey: ");

    let err = RawConnectorConfig::from_file(file.path()).unwrap_err();

    let rendered = err.to_string();
    assert!(rendered.contains(&file.path().display().to_string()), "got: {rendered}");
}

#[test]
fn given_missing_file_when_loading_then_read_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = RawConnectorConfig::from_file(&dir.path().join("absent.json")).unwrap_err();

    assert!(err.to_string().contains("absent.json"));
}

// ============================================================================
// Environment config
// ============================================================================

#[test]
#[serial]
fn given_env_vars_when_loading_from_env_then_values_used() {
    // GIVEN
    clear_env();
    // SAFETY: serialized
    unsafe {
        std::env::set_var(API_KEY_ENV, "env-key");
        std::env::set_var(KEY_SECRET_ENV, "env-secret");
        std::env::set_var(PAGE_SIZE_ENV, "75");
    }

    // WHEN
    let config = RawConnectorConfig::from_env().unwrap().validate().unwrap();

    // THEN
    assert_eq!(config.api_key.expose(), "env-key");
    assert_eq!(config.page_size, 75);
    clear_env();
}

#[test]
#[serial]
fn given_non_numeric_page_size_when_loading_from_env_then_env_error() {
    clear_env();
    // SAFETY: serialized
    unsafe {
        std::env::set_var(PAGE_SIZE_ENV, "lots");
    }

    let err = RawConnectorConfig::from_env().unwrap_err();

    assert!(err.to_string().contains(PAGE_SIZE_ENV));
    clear_env();
}

#[test]
#[serial]
fn given_no_env_vars_when_validating_then_api_key_required() {
    clear_env();

    let err = RawConnectorConfig::from_env().unwrap().validate().unwrap_err();

    assert_eq!(err.message(), "'apiKey' is required");
}
