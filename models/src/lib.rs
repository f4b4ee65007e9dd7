//! Data shapes for the Umbrella connector.
//!
//! Two vocabularies live here side by side:
//!
//! - **vendor**: records exactly as the Umbrella admin API sends them
//! - **resource**: the platform's key/attributes objects and operation inputs
//!
//! Translation between them is plain `TryFrom`; nothing in this crate does I/O.

pub mod error;
pub mod new_user;
pub mod resource;
pub mod vendor;

pub use error::model_error::ModelError;
pub use new_user::builder::{NewUser, NewUserBuilder};
pub use resource::{
    AccountAttributes, AccountCreateInput, AccountDeleteInput, AccountDeleteOutput,
    AccountObject, AccountReadInput, EntitlementAttributes, EntitlementObject, ObjectKey,
    TestConnectionOutput,
};
pub use vendor::{RoleRecord, TokenResponse, UserRecord, VendorId};

pub use common::ErrorLocation;

#[cfg(test)]
mod tests;
