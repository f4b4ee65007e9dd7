//! Failures as the transport reports them, before classification.

use crate::error::connector::BoxError;

use common::HttpStatusCode;

use std::error::Error as StdError;
use std::fmt;
use std::io::ErrorKind as IoErrorKind;

use thiserror::Error as ThisError;

/// Socket-level failure code, named after the errno symbols operators
/// recognise from other tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionCode {
    /// Host name did not resolve (`ENOTFOUND`).
    HostNotFound,
    /// Nothing listening on the port (`ECONNREFUSED`).
    ConnectionRefused,
    ConnectionReset,
    TimedOut,
    Other(String),
}

impl ConnectionCode {
    pub fn as_str(&self) -> &str {
        match self {
            ConnectionCode::HostNotFound => "ENOTFOUND",
            ConnectionCode::ConnectionRefused => "ECONNREFUSED",
            ConnectionCode::ConnectionReset => "ECONNRESET",
            ConnectionCode::TimedOut => "ETIMEDOUT",
            ConnectionCode::Other(code) => code,
        }
    }
}

impl fmt::Display for ConnectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, ThisError)]
pub enum RawFailure {
    /// Umbrella answered with a non-success status.
    #[error("{message}")]
    Http {
        status: HttpStatusCode,
        status_text: String,
        body: String,
        message: String,
    },

    /// The request never got an HTTP answer.
    #[error("{message}")]
    Connection {
        code: ConnectionCode,
        errno: Option<i32>,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    Other {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl RawFailure {
    pub fn http(status: impl Into<HttpStatusCode>, body: impl Into<String>) -> Self {
        let status = status.into();
        let status_text = reqwest::StatusCode::from_u16(status.0)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();
        RawFailure::Http {
            status,
            status_text,
            body: body.into(),
            message: format!("Request failed with status code {status}"),
        }
    }

    pub fn connection(code: ConnectionCode, errno: Option<i32>, message: impl Into<String>) -> Self {
        RawFailure::Connection {
            code,
            errno,
            message: message.into(),
            source: None,
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        RawFailure::Other {
            message: message.into(),
            source: None,
        }
    }

    /// Capture a non-success response, body included.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = HttpStatusCode::from(response.status());
        let body = response.text().await.unwrap_or_default();
        RawFailure::http(status, body)
    }

    pub fn status(&self) -> Option<HttpStatusCode> {
        match self {
            RawFailure::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RawFailure {
    fn from(error: reqwest::Error) -> Self {
        let message = describe_chain(&error);

        // Check specific categories BEFORE falling back to a plain message
        if let Some(status) = error.status() {
            return RawFailure::http(status, String::new());
        }

        if error.is_timeout() {
            return RawFailure::Connection {
                code: ConnectionCode::TimedOut,
                errno: None,
                message,
                source: Some(Box::new(error)),
            };
        }

        if error.is_connect() {
            let (code, errno) = connection_code(&error);
            return RawFailure::Connection {
                code,
                errno,
                message,
                source: Some(Box::new(error)),
            };
        }

        RawFailure::Other {
            message,
            source: Some(Box::new(error)),
        }
    }
}

/// Walk the source chain looking for the socket error behind a connect failure.
pub(crate) fn connection_code(error: &(dyn StdError + 'static)) -> (ConnectionCode, Option<i32>) {
    let mut errno = None;
    let mut current = Some(error);

    while let Some(err) = current {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            errno = errno.or(io.raw_os_error());
            match io.kind() {
                IoErrorKind::ConnectionRefused => return (ConnectionCode::ConnectionRefused, errno),
                IoErrorKind::ConnectionReset => return (ConnectionCode::ConnectionReset, errno),
                IoErrorKind::TimedOut => return (ConnectionCode::TimedOut, errno),
                _ => {}
            }
        }

        let text = err.to_string().to_ascii_lowercase();
        if text.contains("dns error")
            || text.contains("failed to lookup address")
            || text.contains("name or service not known")
            || text.contains("no such host")
        {
            return (ConnectionCode::HostNotFound, errno);
        }

        current = err.source();
    }

    (ConnectionCode::Other(String::from("ECONNECT")), errno)
}

/// `outer: inner: innermost`, since reqwest's own Display hides the cause.
pub(crate) fn describe_chain(error: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut current = error.source();
    while let Some(err) = current {
        let text = err.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        current = err.source();
    }
    parts.join(": ")
}
