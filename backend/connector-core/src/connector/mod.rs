//! Operation surface consumed by the handler layer.
//!
//! Each operation validates its input, calls the client, classifies any
//! transport failure, translates vendor records and pushes the results into
//! a `ResponseSink`.

use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, ErrorKind};
use crate::response::ResponseSink;
use crate::umbrella_client::UmbrellaClient;

use models::{
    AccountCreateInput, AccountDeleteInput, AccountDeleteOutput, AccountObject, AccountReadInput,
    EntitlementObject, ModelError, NewUser, RoleRecord, TestConnectionOutput, UserRecord,
};

use log::{debug, info};
use serde_json::Value;

const FIRST_PAGE: u32 = 1;
const EMPTY_IDENTIFIER_MESSAGE: &str = "Native identifier cannot be empty.";

pub struct UmbrellaConnector {
    client: UmbrellaClient,
}

impl UmbrellaConnector {
    #[track_caller]
    pub fn new(config: &ConnectorConfig) -> Result<Self, ConnectorError> {
        Ok(Self {
            client: UmbrellaClient::new(config)?,
        })
    }

    pub fn from_client(client: UmbrellaClient) -> Self {
        Self { client }
    }

    /// Acquire a token and report success with an empty record.
    pub async fn test_connection(
        &self,
        sink: &mut impl ResponseSink<TestConnectionOutput>,
    ) -> Result<(), ConnectorError> {
        debug!("Performing Test Connection.");
        self.client.test_connection().await?;
        debug!("Test connection is successful");
        sink.send(TestConnectionOutput::default());
        Ok(())
    }

    pub async fn read_account(
        &self,
        input: &AccountReadInput,
        sink: &mut impl ResponseSink<AccountObject>,
    ) -> Result<(), ConnectorError> {
        let identity = input.key.id();
        debug!("Performing read account for: {identity}");
        if identity.trim().is_empty() {
            return Err(ConnectorError::invalid_request(EMPTY_IDENTIFIER_MESSAGE));
        }

        let body = self.client.read_account(identity).await?;
        if is_empty_body(&body) {
            return Err(ConnectorError::invalid_response(
                "Empty response for user resource retrieve.",
            ));
        }

        sink.send(account_from_value(body)?);
        debug!("Read account successful for: {identity}");
        Ok(())
    }

    /// Walk `/admin/v2/users` page by page, starting at 1.
    ///
    /// The API returns neither a total nor a cursor, so the first empty page
    /// ends the listing. A spurious empty page in the middle would end it
    /// early; there is no signal to tell the two apart. A body that is
    /// neither empty nor a list is an invalid response, not the end.
    pub async fn list_accounts(
        &self,
        sink: &mut impl ResponseSink<AccountObject>,
    ) -> Result<(), ConnectorError> {
        let mut page = FIRST_PAGE;
        let mut total = 0usize;

        loop {
            let body = self.client.list_users(page, None).await?;
            let users = match body {
                Value::Null => break,
                Value::Array(users) if users.is_empty() => break,
                Value::Array(users) => users,
                other => {
                    return Err(ConnectorError::invalid_response(format!(
                        "Expected a list of users on page {page}, got: {other}"
                    )));
                }
            };

            debug!("Page {page} returned {} users", users.len());
            for user in users {
                sink.send(account_from_value(user)?);
                total += 1;
            }

            page += 1;
        }

        info!("Umbrella account aggregation successful: {total} accounts, {page} page requests");
        Ok(())
    }

    /// Roles are exposed as `group` entitlements.
    pub async fn list_entitlements(
        &self,
        sink: &mut impl ResponseSink<EntitlementObject>,
    ) -> Result<(), ConnectorError> {
        debug!("Umbrella Entitlements aggregation initiated");
        let body = self.client.list_entitlements().await?;

        let roles = match body {
            Value::Array(roles) => roles,
            Value::Null => {
                return Err(ConnectorError::invalid_response(
                    "Found empty response for entitlement list.",
                ));
            }
            other => {
                return Err(ConnectorError::invalid_response(format!(
                    "Expected a list of roles, got: {other}"
                )));
            }
        };

        for role in roles {
            let record: RoleRecord = serde_json::from_value(role).map_err(|e| {
                ConnectorError::invalid_response("Unreadable role record.").with_source(e)
            })?;
            sink.send(EntitlementObject::try_from(record).map_err(translation_error)?);
        }

        debug!("Umbrella Entitlements aggregation successful");
        Ok(())
    }

    /// Umbrella may keep the record around after deletion; success only
    /// means it accepted the request.
    pub async fn delete_account(
        &self,
        input: &AccountDeleteInput,
        sink: &mut impl ResponseSink<AccountDeleteOutput>,
    ) -> Result<(), ConnectorError> {
        let identity = input.key.id();
        if identity.trim().is_empty() {
            return Err(ConnectorError::invalid_request(EMPTY_IDENTIFIER_MESSAGE));
        }

        self.client.delete_user(identity).await?;

        sink.send(AccountDeleteOutput::default());
        debug!("Umbrella Delete account successful for: {identity}");
        Ok(())
    }

    /// Validate the attribute plan, create the user and emit the created account.
    pub async fn create_account(
        &self,
        input: &AccountCreateInput,
        sink: &mut impl ResponseSink<AccountObject>,
    ) -> Result<(), ConnectorError> {
        debug!("Performing create account.");
        let new_user = NewUser::from_attributes(&input.attributes).map_err(|e| match e {
            ModelError::MissingAttribute { .. } => ConnectorError::invalid_request(e.message()),
            ModelError::Translation { .. } => ConnectorError::invalid_request(e.message()).with_source(e),
        })?;

        let body = self.client.add_user(&new_user.to_payload()).await?;

        let has_id = body.get("id").is_some_and(|id| !id.is_null());
        if !has_id {
            return Err(ConnectorError::invalid_response(format!(
                "Found empty response for user creation. {body}"
            )));
        }

        let account = account_from_value(body)?;
        debug!(
            "Create account successful, the native identifier: {}",
            account.key.id()
        );
        sink.send(account);
        Ok(())
    }
}

fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[track_caller]
fn account_from_value(value: Value) -> Result<AccountObject, ConnectorError> {
    let record: UserRecord = serde_json::from_value(value).map_err(|e| {
        ConnectorError::invalid_response("Unreadable user record.").with_source(e)
    })?;
    AccountObject::try_from(record).map_err(translation_error)
}

#[track_caller]
fn translation_error(error: ModelError) -> ConnectorError {
    ConnectorError::new(ErrorKind::InvalidResponse, error.message(), Some(Box::new(error)))
}
