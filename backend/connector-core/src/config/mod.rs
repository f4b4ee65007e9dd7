//! Connector configuration.
//!
//! The platform hands the connector a JSON document (`apiKey`, `keySecret`,
//! optional `pageSize`). For local runs the same values can come from the
//! environment, optionally seeded from a `.env` file.

use crate::UMBRELLA_BASE_URL;
use crate::error::{ConfigError, ConnectorError};

use common::{ErrorLocation, RedactedSecret};

use std::env;
use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_PAGE_SIZE: u32 = 200;

pub const API_KEY_ENV: &str = "UMBRELLA_API_KEY";
pub const KEY_SECRET_ENV: &str = "UMBRELLA_KEY_SECRET";
pub const PAGE_SIZE_ENV: &str = "UMBRELLA_PAGE_SIZE";
pub const BASE_URL_ENV: &str = "UMBRELLA_BASE_URL";

/// Configuration exactly as supplied, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConnectorConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub key_secret: Option<String>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl RawConnectorConfig {
    /// Read a JSON config document.
    #[track_caller]
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        info!("Loaded connector config from: {}", path.display());
        Ok(config)
    }

    /// Read `UMBRELLA_*` variables, loading `.env` first if one is found.
    #[track_caller]
    pub fn from_env() -> Result<Self, ConfigError> {
        if try_load_dotenv().is_none() {
            debug!("No .env file found - using process environment only");
        }

        let page_size = match read_var(PAGE_SIZE_ENV)? {
            Some(raw) => Some(raw.trim().parse::<u32>().map_err(|e| ConfigError::EnvError {
                location: ErrorLocation::from(Location::caller()),
                name: PAGE_SIZE_ENV.to_string(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        Ok(Self {
            api_key: read_var(API_KEY_ENV)?,
            key_secret: read_var(KEY_SECRET_ENV)?,
            page_size,
            base_url: read_var(BASE_URL_ENV)?,
        })
    }

    /// Check required values and apply defaults.
    #[track_caller]
    pub fn validate(self) -> Result<ConnectorConfig, ConnectorError> {
        let api_key = match self.api_key {
            Some(key) if !key.trim().is_empty() => RedactedSecret::new(key),
            _ => return Err(ConnectorError::invalid_configuration("'apiKey' is required")),
        };

        let key_secret = match self.key_secret {
            Some(secret) if !secret.trim().is_empty() => RedactedSecret::new(secret),
            _ => return Err(ConnectorError::invalid_configuration("'keySecret' is required")),
        };

        let base_url = self.base_url.as_deref().unwrap_or(UMBRELLA_BASE_URL);
        let base_url = Url::parse(base_url).map_err(|e| {
            ConnectorError::invalid_configuration(format!("'baseUrl' is not a valid URL: {base_url}"))
                .with_source(e)
        })?;

        // 0 means "not set", same as an absent value
        let page_size = match self.page_size {
            Some(size) if size > 0 => size,
            _ => DEFAULT_PAGE_SIZE,
        };

        Ok(ConnectorConfig {
            api_key,
            key_secret,
            page_size,
            base_url,
        })
    }
}

/// Validated configuration. Secrets are never printed.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    pub api_key: RedactedSecret,
    pub key_secret: RedactedSecret,
    pub page_size: u32,
    pub base_url: Url,
}

impl ConnectorConfig {
    #[track_caller]
    pub fn new(api_key: impl Into<String>, key_secret: impl Into<String>) -> Result<Self, ConnectorError> {
        RawConnectorConfig {
            api_key: Some(api_key.into()),
            key_secret: Some(key_secret.into()),
            ..Default::default()
        }
        .validate()
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }
}

#[track_caller]
fn read_var(name: &str) -> Result<Option<String>, ConfigError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            warn!("Env var {name} contains invalid unicode");
            Err(ConfigError::EnvError {
                location: ErrorLocation::from(Location::caller()),
                name: name.to_string(),
                reason: String::from("contains invalid unicode"),
            })
        }
    }
}

/// Attempts to load .env from the working directory, then next to the executable.
fn try_load_dotenv() -> Option<PathBuf> {
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded .env from: {:?}", path);
        return Some(path);
    }

    let exe_dir = env::current_exe().ok()?.parent()?.to_path_buf();
    let env_path = exe_dir.join(".env");
    if !env_path.exists() {
        return None;
    }

    match dotenvy::from_path(&env_path) {
        Ok(()) => {
            info!("Loaded .env from: {:?}", env_path);
            Some(env_path)
        }
        Err(e) => {
            warn!("Failed to parse .env at {:?}: {}", env_path, e);
            None
        }
    }
}
