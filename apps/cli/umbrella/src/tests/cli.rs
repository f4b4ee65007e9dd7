use crate::cli::{Cli, Command, parse_attributes};
use crate::error::AppError;

use std::path::PathBuf;

use clap::Parser;
use serde_json::json;

#[test]
fn given_global_flags_after_subcommand_when_parsing_then_accepted() {
    // GIVEN / WHEN
    let cli = Cli::try_parse_from([
        "umbrella",
        "read-account",
        "8215739",
        "--config",
        "conf.json",
        "--log-dir",
        "/tmp/logs",
    ])
    .unwrap();

    // THEN
    assert_eq!(cli.command, Command::ReadAccount { id: String::from("8215739") });
    assert_eq!(cli.config, Some(PathBuf::from("conf.json")));
    assert_eq!(cli.log_dir, Some(PathBuf::from("/tmp/logs")));
}

#[test]
fn given_create_without_attributes_when_parsing_then_rejected() {
    let result = Cli::try_parse_from(["umbrella", "create-account"]);

    assert!(result.is_err());
}

#[test]
fn given_each_subcommand_when_parsing_then_name_round_trips() {
    for args in [
        vec!["umbrella", "test-connection"],
        vec!["umbrella", "read-account", "1"],
        vec!["umbrella", "list-accounts"],
        vec!["umbrella", "list-entitlements"],
        vec!["umbrella", "delete-account", "1"],
        vec!["umbrella", "create-account", "--attributes", "{}"],
    ] {
        let cli = Cli::try_parse_from(&args).unwrap();
        assert_eq!(cli.command.name(), args[1]);
    }
}

/// **VALUE**: Verifies the create command name used for logging never leaks the plan.
///
/// **BUG THIS CATCHES**: Would catch logging the Debug form of the command, which
/// includes the raw `--attributes` JSON and therefore the password.
#[test]
fn given_create_with_password_when_naming_then_password_absent() {
    let cli = Cli::try_parse_from([
        "umbrella",
        "create-account",
        "--attributes",
        r#"{"password":"hunter2"}"#,
    ])
    .unwrap();

    assert!(!cli.command.name().contains("hunter2"));
}

#[test]
fn given_json_object_when_parsing_attributes_then_map_returned() {
    let attributes = parse_attributes(r#"{"firstname":"Ada","roleId":2}"#).unwrap();

    assert_eq!(attributes.get("firstname"), Some(&json!("Ada")));
    assert_eq!(attributes.get("roleId"), Some(&json!(2)));
}

#[test]
fn given_json_array_when_parsing_attributes_then_input_error() {
    let err = parse_attributes("[1,2]").unwrap_err();

    assert!(matches!(err, AppError::Input { .. }));
    assert!(err.message().contains("must be a JSON object"));
}

#[test]
fn given_invalid_json_when_parsing_attributes_then_input_error() {
    let err = parse_attributes("{firstname:").unwrap_err();

    assert!(err.message().starts_with("--attributes is not valid JSON"));
}
