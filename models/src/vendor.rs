//! Records as returned by the Umbrella admin API (`/admin/v2`).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier assigned by Umbrella. The API sends integers, but string ids
/// are accepted so a proxy or a newer API version cannot break parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VendorId {
    Number(i64),
    Text(String),
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VendorId::Number(n) => write!(f, "{n}"),
            VendorId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Body of `POST /auth/v2/token`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// A user as listed by `GET /admin/v2/users`.
///
/// Only the id is typed. Every other attribute is carried through as sent,
/// so one odd value cannot fail a whole aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    pub id: Option<VendorId>,
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

/// A role as listed by `GET /admin/v2/roles`. Only the key is typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleRecord {
    pub role_id: Option<VendorId>,
    pub label: Option<Value>,
    pub organization_id: Option<Value>,
}
