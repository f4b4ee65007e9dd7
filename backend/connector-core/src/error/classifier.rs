//! Maps raw transport failures onto the five connector error kinds.

use crate::error::connector::{ConnectorError, ErrorKind};
use crate::error::raw_failure::{ConnectionCode, RawFailure};

use common::HttpStatusCode;

/// Classify a raw failure. Total: every input yields exactly one error, and
/// the raw failure is kept as its source.
#[track_caller]
pub fn classify(failure: RawFailure) -> ConnectorError {
    let (kind, message) = describe(&failure);
    ConnectorError::new(kind, message, Some(Box::new(failure)))
}

fn describe(failure: &RawFailure) -> (ErrorKind, String) {
    match failure {
        RawFailure::Http {
            status,
            status_text,
            body,
            message,
        } => {
            let details = format!("{status} {message}, {status_text}, {body}");
            match *status {
                HttpStatusCode::BAD_REQUEST
                | HttpStatusCode::NOT_FOUND
                | HttpStatusCode::CONFLICT => (ErrorKind::InvalidRequest, details),
                HttpStatusCode::UNAUTHORIZED => (
                    ErrorKind::InvalidConfiguration,
                    format!("{status} Unauthorized"),
                ),
                HttpStatusCode::FORBIDDEN => (ErrorKind::InsufficientPermission, details),
                _ => (ErrorKind::Generic, details),
            }
        }
        RawFailure::Connection {
            code,
            errno,
            message,
            ..
        } => {
            let errno = errno.map_or_else(|| String::from("none"), |e| e.to_string());
            match code {
                ConnectionCode::HostNotFound => (
                    ErrorKind::InvalidConfiguration,
                    format!("Unknown host. message: {message} , errno: {errno} , code: {code}"),
                ),
                ConnectionCode::ConnectionRefused => (
                    ErrorKind::InvalidConfiguration,
                    format!(
                        "Connection refused. message: {message} , errno: {errno} , code: {code}"
                    ),
                ),
                _ => (ErrorKind::Generic, format!("{message} , code: {code}")),
            }
        }
        RawFailure::Other { message, .. } => (ErrorKind::Generic, message.clone()),
    }
}
