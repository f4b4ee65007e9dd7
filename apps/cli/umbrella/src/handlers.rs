//! Platform-facing operation handlers.
//!
//! Each handler obtains the connector from its `HandlerContext`, runs one
//! facade operation and routes any failure through `log_and_rethrow`.
//! Classified connector errors pass through unchanged; anything else is
//! wrapped into a generic `ConnectorError` carrying the handler's context.

use crate::error::AppError;

use common::ErrorLocation;

use connector_core::{ConnectorError, RawConnectorConfig, ResponseSink, UmbrellaConnector};

use models::{
    AccountCreateInput, AccountDeleteInput, AccountDeleteOutput, AccountObject, AccountReadInput,
    EntitlementObject, TestConnectionOutput,
};

use std::panic::Location;
use std::path::PathBuf;

use log::{debug, error, info};
use serde_json::Value;
use tokio::sync::OnceCell;

const PASSWORD_ATTRIBUTE: &str = "password";
const MASK: &str = "****";

/// Where the connector configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `UMBRELLA_*` variables, seeded from `.env` when present
    Environment,
    /// JSON config document
    File(PathBuf),
}

/// Shared state for a run of handlers.
///
/// The connector is built on first use and reused afterwards, so its token
/// survives across operations.
pub struct HandlerContext {
    source: ConfigSource,
    connector: OnceCell<UmbrellaConnector>,
}

impl HandlerContext {
    pub fn new(source: ConfigSource) -> Self {
        Self {
            source,
            connector: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Connector for this context, built from the configuration source on
    /// first call.
    pub async fn connector(&self) -> Result<&UmbrellaConnector, AppError> {
        self.connector
            .get_or_try_init(|| async {
                debug!("Instantiate new Umbrella connector");
                let config = load_config(&self.source)?.validate()?;
                Ok::<_, AppError>(UmbrellaConnector::new(&config)?)
            })
            .await
    }
}

#[track_caller]
fn load_config(source: &ConfigSource) -> Result<RawConnectorConfig, AppError> {
    let loaded = match source {
        ConfigSource::Environment => RawConnectorConfig::from_env(),
        ConfigSource::File(path) => RawConnectorConfig::from_file(path),
    };

    loaded.map_err(|e| AppError::Config {
        message: String::from("Failed to load connector configuration"),
        location: ErrorLocation::from(Location::caller()),
        source: e,
    })
}

pub async fn std_test_connection(
    context: &HandlerContext,
    sink: &mut impl ResponseSink<TestConnectionOutput>,
) -> Result<(), ConnectorError> {
    let result = async {
        let connector = context.connector().await?;
        debug!("Performing Test Connection");
        connector.test_connection(sink).await?;
        Ok::<(), AppError>(())
    }
    .await;

    result.map_err(|e| log_and_rethrow(e, "Test Connection Failed."))
}

pub async fn std_account_read(
    context: &HandlerContext,
    input: &AccountReadInput,
    sink: &mut impl ResponseSink<AccountObject>,
) -> Result<(), ConnectorError> {
    let result = async {
        let connector = context.connector().await?;
        connector.read_account(input, sink).await?;
        Ok::<(), AppError>(())
    }
    .await;

    result.map_err(|e| log_and_rethrow(e, &format!("Read account failed for: {}", input.key.id())))
}

pub async fn std_account_list(
    context: &HandlerContext,
    sink: &mut impl ResponseSink<AccountObject>,
) -> Result<(), ConnectorError> {
    let result = async {
        let connector = context.connector().await?;
        debug!("Performing Account Aggregation");
        connector.list_accounts(sink).await?;
        Ok::<(), AppError>(())
    }
    .await;

    result.map_err(|e| log_and_rethrow(e, "Account aggregation failed."))
}

/// Roles only; every entitlement is of type `group`.
pub async fn std_entitlement_list(
    context: &HandlerContext,
    sink: &mut impl ResponseSink<EntitlementObject>,
) -> Result<(), ConnectorError> {
    let result = async {
        let connector = context.connector().await?;
        connector.list_entitlements(sink).await?;
        Ok::<(), AppError>(())
    }
    .await;

    result.map_err(|e| log_and_rethrow(e, "Entitlement aggregation failed."))
}

pub async fn std_account_delete(
    context: &HandlerContext,
    input: &AccountDeleteInput,
    sink: &mut impl ResponseSink<AccountDeleteOutput>,
) -> Result<(), ConnectorError> {
    let result = async {
        let connector = context.connector().await?;
        connector.delete_account(input, sink).await?;
        Ok::<(), AppError>(())
    }
    .await;

    result.map_err(|e| log_and_rethrow(e, &format!("Account delete failed for: {}", input.key.id())))
}

pub async fn std_account_create(
    context: &HandlerContext,
    input: &AccountCreateInput,
    sink: &mut impl ResponseSink<AccountObject>,
) -> Result<(), ConnectorError> {
    info!("Account creation plan. {}", masked_plan(input));

    let result = async {
        let connector = context.connector().await?;
        connector.create_account(input, sink).await?;
        Ok::<(), AppError>(())
    }
    .await;

    result.map_err(|e| log_and_rethrow(e, "Account create failed."))
}

/// Log a handler failure and hand back the error the platform should see.
///
/// Classified connector errors are returned as they are. Anything else
/// becomes a generic connector error whose message is prefixed with
/// `context` and whose source is the original failure.
#[track_caller]
pub fn log_and_rethrow(error: AppError, context: &str) -> ConnectorError {
    match error {
        AppError::Connector(e) => {
            error!("{context} {e}");
            e
        }
        other => {
            let wrapped =
                ConnectorError::generic(format!("{context} {}", other.message())).with_source(other);
            error!("{wrapped}");
            wrapped
        }
    }
}

/// Creation plan as JSON with the password replaced, safe to log.
pub fn masked_plan(input: &AccountCreateInput) -> Value {
    let mut plan = serde_json::to_value(input).unwrap_or(Value::Null);
    if let Some(password) = plan
        .get_mut("attributes")
        .and_then(|attributes| attributes.get_mut(PASSWORD_ATTRIBUTE))
    {
        *password = Value::String(MASK.to_string());
    }
    plan
}
