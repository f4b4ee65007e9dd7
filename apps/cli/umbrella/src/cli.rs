//! Command line surface of the `umbrella` binary.

use crate::error::AppError;
use crate::handlers::{
    HandlerContext, std_account_create, std_account_delete, std_account_list, std_account_read,
    std_entitlement_list, std_test_connection,
};
use crate::output::JsonLinesSink;

use common::ErrorLocation;

use models::{AccountCreateInput, AccountDeleteInput, AccountReadInput, ObjectKey};

use std::io::Write;
use std::panic::Location;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

/// Cisco Umbrella identity connector.
///
/// Records are printed to stdout as JSON lines; logs go to stderr.
#[derive(Debug, Parser)]
#[command(name = "umbrella")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// JSON config file with apiKey, keySecret and optional pageSize/baseUrl.
    #[arg(long, global = true, env = "UMBRELLA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also write logs to umbrella-connector.log in this directory.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Check that the credentials can obtain a token.
    TestConnection,

    /// Read one account by native identifier.
    ReadAccount { id: String },

    /// List every account.
    ListAccounts,

    /// List every role as a group entitlement.
    ListEntitlements,

    /// Delete one account by native identifier.
    DeleteAccount { id: String },

    /// Create an account from a JSON object of attributes.
    CreateAccount {
        /// e.g. '{"firstname":"Ada","lastname":"Lovelace","email":"ada@example.com","roleId":2,"timezone":"UTC","password":"..."}'
        #[arg(long)]
        attributes: String,

        /// Identity of the account being created, if the platform supplies one.
        #[arg(long)]
        identity: Option<String>,
    },
}

impl Command {
    /// Subcommand name as typed, for logging. Never includes arguments.
    pub fn name(&self) -> &'static str {
        match self {
            Command::TestConnection => "test-connection",
            Command::ReadAccount { .. } => "read-account",
            Command::ListAccounts => "list-accounts",
            Command::ListEntitlements => "list-entitlements",
            Command::DeleteAccount { .. } => "delete-account",
            Command::CreateAccount { .. } => "create-account",
        }
    }
}

/// Run one command and stream its records to `writer`.
///
/// Returns the number of records written.
pub async fn run<W: Write>(
    command: &Command,
    context: &HandlerContext,
    writer: W,
) -> Result<usize, AppError> {
    let mut sink = JsonLinesSink::new(writer);

    match command {
        Command::TestConnection => std_test_connection(context, &mut sink).await?,
        Command::ReadAccount { id } => {
            let input = AccountReadInput {
                key: ObjectKey::simple(id.as_str()),
            };
            std_account_read(context, &input, &mut sink).await?
        }
        Command::ListAccounts => std_account_list(context, &mut sink).await?,
        Command::ListEntitlements => std_entitlement_list(context, &mut sink).await?,
        Command::DeleteAccount { id } => {
            let input = AccountDeleteInput {
                key: ObjectKey::simple(id.as_str()),
            };
            std_account_delete(context, &input, &mut sink).await?
        }
        Command::CreateAccount {
            attributes,
            identity,
        } => {
            let input = AccountCreateInput {
                identity: identity.clone(),
                attributes: parse_attributes(attributes)?,
            };
            std_account_create(context, &input, &mut sink).await?
        }
    }

    sink.finish()
}

/// Parse `--attributes`; it must be a JSON object.
#[track_caller]
pub fn parse_attributes(raw: &str) -> Result<Map<String, Value>, AppError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(attributes)) => Ok(attributes),
        Ok(other) => Err(AppError::Input {
            message: format!("--attributes must be a JSON object, got: {other}"),
            location: ErrorLocation::from(Location::caller()),
        }),
        Err(e) => Err(AppError::Input {
            message: format!("--attributes is not valid JSON: {e}"),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
