use common::ErrorLocation;

use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;

use thiserror::Error as ThisError;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The five error kinds surfaced to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Generic,
    InvalidConfiguration,
    InvalidRequest,
    InvalidResponse,
    InsufficientPermission,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Generic => "generic",
            ErrorKind::InvalidConfiguration => "invalid_configuration",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::InvalidResponse => "invalid_response",
            ErrorKind::InsufficientPermission => "insufficient_permission",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every connector operation.
///
/// `source` keeps the original failure for diagnostics; callers should
/// branch on `kind()` and show `message()`.
#[derive(Debug, ThisError)]
pub enum ConnectorError {
    /// Some problem with the managed system or the data sent to it.
    #[error("Connector Error: {message} {location}")]
    Generic {
        message: String,
        location: ErrorLocation,
        #[source]
        source: Option<BoxError>,
    },

    /// Bad credentials, unknown host, refused connection.
    #[error("Invalid Configuration Error: {message} {location}")]
    InvalidConfiguration {
        message: String,
        location: ErrorLocation,
        #[source]
        source: Option<BoxError>,
    },

    /// The request could not be built, or Umbrella rejected it as malformed.
    #[error("Invalid Request Error: {message} {location}")]
    InvalidRequest {
        message: String,
        location: ErrorLocation,
        #[source]
        source: Option<BoxError>,
    },

    /// Umbrella answered, but not with what the operation needs.
    #[error("Invalid Response Error: {message} {location}")]
    InvalidResponse {
        message: String,
        location: ErrorLocation,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Insufficient Permission Error: {message} {location}")]
    InsufficientPermission {
        message: String,
        location: ErrorLocation,
        #[source]
        source: Option<BoxError>,
    },
}

impl ConnectorError {
    #[track_caller]
    pub fn new(kind: ErrorKind, message: impl Into<String>, source: Option<BoxError>) -> Self {
        let message = message.into();
        let location = ErrorLocation::from(Location::caller());
        match kind {
            ErrorKind::Generic => ConnectorError::Generic {
                message,
                location,
                source,
            },
            ErrorKind::InvalidConfiguration => ConnectorError::InvalidConfiguration {
                message,
                location,
                source,
            },
            ErrorKind::InvalidRequest => ConnectorError::InvalidRequest {
                message,
                location,
                source,
            },
            ErrorKind::InvalidResponse => ConnectorError::InvalidResponse {
                message,
                location,
                source,
            },
            ErrorKind::InsufficientPermission => ConnectorError::InsufficientPermission {
                message,
                location,
                source,
            },
        }
    }

    #[track_caller]
    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Generic, message, None)
    }

    #[track_caller]
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfiguration, message, None)
    }

    #[track_caller]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message, None)
    }

    #[track_caller]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidResponse, message, None)
    }

    #[track_caller]
    pub fn insufficient_permission(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientPermission, message, None)
    }

    /// Attach the original failure.
    pub fn with_source(mut self, cause: impl Into<BoxError>) -> Self {
        let slot = match &mut self {
            ConnectorError::Generic { source, .. }
            | ConnectorError::InvalidConfiguration { source, .. }
            | ConnectorError::InvalidRequest { source, .. }
            | ConnectorError::InvalidResponse { source, .. }
            | ConnectorError::InsufficientPermission { source, .. } => source,
        };
        *slot = Some(cause.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConnectorError::Generic { .. } => ErrorKind::Generic,
            ConnectorError::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            ConnectorError::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            ConnectorError::InvalidResponse { .. } => ErrorKind::InvalidResponse,
            ConnectorError::InsufficientPermission { .. } => ErrorKind::InsufficientPermission,
        }
    }

    /// Message without the kind prefix and location suffix.
    pub fn message(&self) -> &str {
        match self {
            ConnectorError::Generic { message, .. }
            | ConnectorError::InvalidConfiguration { message, .. }
            | ConnectorError::InvalidRequest { message, .. }
            | ConnectorError::InvalidResponse { message, .. }
            | ConnectorError::InsufficientPermission { message, .. } => message,
        }
    }

    pub fn location(&self) -> ErrorLocation {
        match self {
            ConnectorError::Generic { location, .. }
            | ConnectorError::InvalidConfiguration { location, .. }
            | ConnectorError::InvalidRequest { location, .. }
            | ConnectorError::InvalidResponse { location, .. }
            | ConnectorError::InsufficientPermission { location, .. } => *location,
        }
    }
}
