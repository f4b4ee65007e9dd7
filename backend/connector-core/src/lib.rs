pub mod config;
pub mod connector;
pub mod error;
pub mod response;
pub mod umbrella_client;

pub use config::{ConnectorConfig, RawConnectorConfig};
pub use connector::UmbrellaConnector;
pub use error::{ClientError, ConnectorError, ErrorKind, RawFailure, classify};
pub use response::ResponseSink;
pub use umbrella_client::UmbrellaClient;
pub use umbrella_client::retry::{RetryDecision, RetryPolicy};

#[cfg(test)]
mod tests;

pub const UMBRELLA_BASE_URL: &str = "https://api.umbrella.com";
pub const CONNECTOR_USER_AGENT: &str =
    const_format::concatcp!("umbrella-connector/", env!("CARGO_PKG_VERSION"));
