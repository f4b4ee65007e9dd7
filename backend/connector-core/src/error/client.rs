use crate::error::classifier::classify;
use crate::error::connector::ConnectorError;
use crate::error::raw_failure::RawFailure;

use thiserror::Error as ThisError;

/// Failure returned by `UmbrellaClient`.
///
/// Transport failures stay raw until they cross into the facade, where the
/// `From` impl below runs them through `classify`.
#[derive(Debug, ThisError)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] RawFailure),

    #[error(transparent)]
    Connector(#[from] ConnectorError),
}

impl ClientError {
    pub fn status(&self) -> Option<common::HttpStatusCode> {
        match self {
            ClientError::Transport(raw) => raw.status(),
            ClientError::Connector(_) => None,
        }
    }
}

impl From<ClientError> for ConnectorError {
    #[track_caller]
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Transport(raw) => classify(raw),
            ClientError::Connector(typed) => typed,
        }
    }
}
