use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error;

/// Failures loading configuration, as opposed to configuration that loaded
/// but is invalid (that is `ConnectorError::InvalidConfiguration`).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config Read Error: {path}: {source} {location}")]
    ReadError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config Parse Error: {path}: {reason} {location}")]
    ParseError {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    #[error("Config Env Error: {name}: {reason} {location}")]
    EnvError {
        location: ErrorLocation,
        name: String,
        reason: String,
    },
}
