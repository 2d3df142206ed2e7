//! # Configuration Module
//!
//! Deployment settings for the handler set, read from an optional YAML file
//! and then from environment variables (environment wins).
//!
//! ## Example file
//!
//! ```yaml
//! table_name: items
//! dynamodb:
//!   region: eu-west-1
//!   endpoint_url: http://localhost:8000
//! cors:
//!   allowed_origins: ["https://app.example.com"]
//!   allow_credentials: true
//!   max_age: 600
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Setting |
//! |---|---|
//! | `ITEMS_CONFIG` | path of the YAML file (when `--config` is not given) |
//! | `TABLE_NAME` | `table_name` |
//! | `ITEMS_AWS_REGION` | `dynamodb.region` |
//! | `ITEMS_DYNAMODB_ENDPOINT` | `dynamodb.endpoint_url` |
//! | `ITEMS_CORS_ALLOWED_ORIGINS` | `cors.allowed_origins` (comma-separated) |
//! | `ITEMS_CORS_ALLOW_CREDENTIALS` | `cors.allow_credentials` |
//! | `ITEMS_CORS_MAX_AGE` | `cors.max_age` (seconds) |

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::middleware::DEFAULT_ALLOWED_HEADERS;
use crate::store::DynamoConfig;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "ITEMS_CONFIG";

/// Complete handler-set configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// DynamoDB table holding the items
    pub table_name: String,
    pub dynamodb: DynamoSettings,
    pub cors: CorsSettings,
}

/// Overrides applied on top of the ambient AWS SDK configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DynamoSettings {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

/// Cross-origin policy. Defaults allow any origin.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allow_credentials: bool,
    pub max_age: Option<u32>,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_headers: DEFAULT_ALLOWED_HEADERS
                .iter()
                .map(|h| h.to_string())
                .collect(),
            allowed_methods: ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            allow_credentials: false,
            max_age: None,
        }
    }
}

/// Configuration rejected at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No table name from file or `TABLE_NAME`
    MissingTableName,
    /// An environment override could not be parsed
    InvalidEnv {
        /// Variable name
        name: &'static str,
        /// Rejected value
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingTableName => {
                write!(f, "table name is not configured (set TABLE_NAME or table_name)")
            }
            ConfigError::InvalidEnv { name, value } => {
                write!(f, "invalid value '{value}' for {name}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    /// Load the file at `path` (or `$ITEMS_CONFIG`, if set), then apply the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));
        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parse a YAML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(table) = lookup("TABLE_NAME") {
            self.table_name = table;
        }
        if let Some(region) = lookup("ITEMS_AWS_REGION") {
            self.dynamodb.region = Some(region);
        }
        if let Some(endpoint) = lookup("ITEMS_DYNAMODB_ENDPOINT") {
            self.dynamodb.endpoint_url = Some(endpoint);
        }
        if let Some(origins) = lookup("ITEMS_CORS_ALLOWED_ORIGINS") {
            self.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(value) = lookup("ITEMS_CORS_ALLOW_CREDENTIALS") {
            self.cors.allow_credentials =
                value.parse().map_err(|_| ConfigError::InvalidEnv {
                    name: "ITEMS_CORS_ALLOW_CREDENTIALS",
                    value: value.clone(),
                })?;
        }
        if let Some(value) = lookup("ITEMS_CORS_MAX_AGE") {
            let seconds = value.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "ITEMS_CORS_MAX_AGE",
                value: value.clone(),
            })?;
            self.cors.max_age = Some(seconds);
        }
        Ok(())
    }

    /// Check the settings the DynamoDB store needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::MissingTableName);
        }
        Ok(())
    }

    #[must_use]
    pub fn dynamo_config(&self) -> DynamoConfig {
        DynamoConfig {
            table_name: self.table_name.clone(),
            region: self.dynamodb.region.clone(),
            endpoint_url: self.dynamodb.endpoint_url.clone(),
        }
    }
}
