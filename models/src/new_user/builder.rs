use crate::error::model_error::ModelError;
use crate::ErrorLocation;

use common::RedactedSecret;

use std::panic::Location;

use serde_json::{Map, Number, Value};

const FIRSTNAME: &str = "firstname";
const LASTNAME: &str = "lastname";
const EMAIL: &str = "email";
const PASSWORD: &str = "password";
const TIMEZONE: &str = "timezone";
const ROLE_ID: &str = "roleId";
/// Name reported when `roleId` is missing.
const ROLE: &str = "role";

/// Validated body for `POST /admin/v2/users`.
///
/// Attributes outside the required set are passed through untouched.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub firstname: String,
    pub lastname: String,
    pub role_id: Value,
    pub email: String,
    pub timezone: String,
    password: RedactedSecret,
    pub extra: Map<String, Value>,
}

impl NewUser {
    /// Validate an attribute plan coming from the platform.
    #[track_caller]
    pub fn from_attributes(attributes: &Map<String, Value>) -> Result<Self, ModelError> {
        let mut builder = NewUserBuilder::default();
        let mut extra = Map::new();

        for (name, value) in attributes {
            match name.as_str() {
                FIRSTNAME => builder.firstname = text_value(value),
                LASTNAME => builder.lastname = text_value(value),
                EMAIL => builder.email = text_value(value),
                TIMEZONE => builder.timezone = text_value(value),
                PASSWORD => builder.password = text_value(value),
                ROLE_ID => {
                    builder.role_id = if is_blank(value) {
                        None
                    } else {
                        Some(value.clone())
                    }
                }
                _ => {
                    extra.insert(name.clone(), value.clone());
                }
            }
        }

        builder.with_extra(extra).build()
    }

    /// JSON body sent to Umbrella. This is the only place the password leaves
    /// its wrapper.
    pub fn to_payload(&self) -> Value {
        let mut payload = self.extra.clone();
        payload.insert(FIRSTNAME.into(), Value::String(self.firstname.clone()));
        payload.insert(LASTNAME.into(), Value::String(self.lastname.clone()));
        payload.insert(EMAIL.into(), Value::String(self.email.clone()));
        payload.insert(
            PASSWORD.into(),
            Value::String(self.password.expose().to_string()),
        );
        payload.insert(ROLE_ID.into(), self.role_id.clone());
        payload.insert(TIMEZONE.into(), Value::String(self.timezone.clone()));
        Value::Object(payload)
    }
}

/// Builder for creating validated NewUser instances.
#[derive(Debug, Default)]
pub struct NewUserBuilder {
    firstname: Option<String>,
    lastname: Option<String>,
    role_id: Option<Value>,
    email: Option<String>,
    timezone: Option<String>,
    password: Option<String>,
    extra: Map<String, Value>,
}

impl NewUserBuilder {
    pub fn with_firstname(mut self, firstname: impl Into<String>) -> Self {
        self.firstname = Some(firstname.into());
        self
    }

    pub fn with_lastname(mut self, lastname: impl Into<String>) -> Self {
        self.lastname = Some(lastname.into());
        self
    }

    pub fn with_role_id(mut self, role_id: impl Into<Value>) -> Self {
        self.role_id = Some(role_id.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    /// Build the NewUser, reporting the first missing attribute in the order
    /// firstname, lastname, role, email, timezone, password.
    #[track_caller]
    pub fn build(self) -> Result<NewUser, ModelError> {
        let location = ErrorLocation::from(Location::caller());

        let firstname = required(self.firstname, FIRSTNAME, location)?;
        let lastname = required(self.lastname, LASTNAME, location)?;
        let role_id = match self.role_id {
            Some(value) if !is_blank(&value) => value,
            _ => {
                return Err(ModelError::MissingAttribute {
                    attribute: ROLE,
                    location,
                });
            }
        };
        let email = required(self.email, EMAIL, location)?;
        let timezone = required(self.timezone, TIMEZONE, location)?;
        let password = required(self.password, PASSWORD, location)?;

        Ok(NewUser {
            firstname,
            lastname,
            role_id,
            email,
            timezone,
            password: RedactedSecret::new(password),
            extra: self.extra,
        })
    }
}

fn required(
    value: Option<String>,
    attribute: &'static str,
    location: ErrorLocation,
) -> Result<String, ModelError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ModelError::MissingAttribute {
            attribute,
            location,
        }),
    }
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Null, blank strings, `false` and zero count as "not provided".
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Bool(b) => !b,
        Value::Number(n) => *n == Number::from(0) || n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}
