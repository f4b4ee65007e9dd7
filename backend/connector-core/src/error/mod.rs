//! Error taxonomy for the connector.
//!
//! - `ConnectorError`: the five kinds callers ever see
//! - `RawFailure`: what the transport produced before classification
//! - `ClientError`: what the API client returns (raw or already typed)
//! - `classify`: the only road from `RawFailure` to `ConnectorError`

pub mod classifier;
pub mod client;
pub mod config;
pub mod connector;
pub mod raw_failure;

pub use classifier::classify;
pub use client::ClientError;
pub use config::ConfigError;
pub use connector::{BoxError, ConnectorError, ErrorKind};
pub use raw_failure::{ConnectionCode, RawFailure};
