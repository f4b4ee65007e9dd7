//! Platform-side resource objects and operation inputs.

pub mod translate;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity of a platform object.
///
/// Serialized as `{"simple":{"id":"..."}}` or
/// `{"compound":{"lookupId":"...","uniqueId":"..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ObjectKey {
    Simple { id: String },
    Compound { lookup_id: String, unique_id: String },
}

impl ObjectKey {
    pub fn simple(id: impl Into<String>) -> Self {
        ObjectKey::Simple { id: id.into() }
    }

    /// The native identifier used to address the vendor record.
    pub fn id(&self) -> &str {
        match self {
            ObjectKey::Simple { id } => id,
            ObjectKey::Compound { lookup_id, .. } => lookup_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountReadInput {
    pub key: ObjectKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDeleteInput {
    pub key: ObjectKey,
}

/// Attribute plan for a new account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountCreateInput {
    #[serde(default)]
    pub identity: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAttributes {
    pub id: String,
    pub firstname: Option<Value>,
    pub lastname: Option<Value>,
    pub email: Option<Value>,
    pub role: Option<Value>,
    pub role_id: Option<Value>,
    pub status: Option<Value>,
    pub two_factor_enable: Option<Value>,
    pub timezone: Option<Value>,
    pub last_login_time: Option<Value>,
}

/// Account as emitted by read, list and create.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountObject {
    pub key: ObjectKey,
    pub disabled: bool,
    pub attributes: AccountAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementAttributes {
    pub role_id: String,
    pub label: Option<Value>,
    pub organization_id: Option<Value>,
}

/// Role exposed to the platform as a `group` entitlement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitlementObject {
    pub key: ObjectKey,
    #[serde(rename = "type")]
    pub entitlement_type: String,
    pub attributes: EntitlementAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestConnectionOutput {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountDeleteOutput {}
