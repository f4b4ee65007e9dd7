//! Shared building blocks for the Umbrella connector workspace.
//!
//! Everything in here is vendor-agnostic: source-location tracking for
//! errors, HTTP status helpers used by the retry policy, and a secret
//! wrapper that keeps credentials and bearer tokens out of logs.
//!
//! ## Architecture
//!
//! - **common** (this crate): Cross-cutting primitives
//! - **models**: Vendor records and platform resource objects
//! - **connector-core**: API client, error taxonomy, operations
//! - **umbrella**: Handler layer and CLI wiring everything together

pub mod error;
pub mod http_status;
pub mod redacted_secret;

pub use error::error_location::ErrorLocation;
pub use http_status::HttpStatusCode;
pub use redacted_secret::RedactedSecret;

#[cfg(test)]
mod tests;
