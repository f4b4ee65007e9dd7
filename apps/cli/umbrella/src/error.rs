use common::ErrorLocation;

use connector_core::ConnectorError;
use connector_core::error::ConfigError;

use thiserror::Error;

/// Errors raised by the CLI and handler plumbing.
///
/// `Connector` carries an already-classified connector failure and is passed
/// through untouched at the handler boundary. Every other variant is wrapped
/// into a generic `ConnectorError` with the handler's context.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Connector(#[from] ConnectorError),

    /// Config document or environment could not be loaded
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
        #[source]
        source: ConfigError,
    },

    /// Command line input could not be turned into an operation input
    #[error("Input Error: {message} {location}")]
    Input {
        message: String,
        location: ErrorLocation,
    },

    /// Writing records to the output stream failed
    #[error("Output Error: {message} {location}")]
    Output {
        message: String,
        location: ErrorLocation,
    },

    #[error("Logger Error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },
}

impl AppError {
    /// Message without the location suffix.
    pub fn message(&self) -> String {
        match self {
            AppError::Connector(e) => e.message().to_string(),
            AppError::Config { message, .. }
            | AppError::Input { message, .. }
            | AppError::Output { message, .. }
            | AppError::Logger { message, .. } => message.clone(),
        }
    }
}
