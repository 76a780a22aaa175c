//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;
use ussd_application::BehaviorConfig;
use ussd_application::config::DEFAULT_TURN_TIMEOUT;
use ussd_domain::{Dialect, DomainError, Endpoint, EndpointId, NewEndpoint};

/// Prefix for the ids of endpoints declared in config files
pub const CONFIG_ENDPOINT_PREFIX: &str = "config:";

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("behavior.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("endpoints[{index}]: {source}")]
    InvalidEndpoint { index: usize, source: DomainError },

    #[error("duplicate endpoint name in config: {0}")]
    DuplicateEndpoint(String),
}

/// Raw behavior configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    /// Upper bound on one turn's round trip, in seconds
    pub timeout_seconds: u64,
}

impl Default for FileBehaviorConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TURN_TIMEOUT.as_secs(),
        }
    }
}

/// Raw endpoint catalog configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    /// Catalog file; defaults to `$XDG_DATA_HOME/ussd-sim/endpoints.json`
    pub path: Option<PathBuf>,
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Append a JSONL transcript of every dialogue to this file
    pub transcript_path: Option<PathBuf>,
}

/// An endpoint declared in a config file (read-only in the catalog)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEndpointConfig {
    pub name: String,
    pub callback_url: String,
    pub dialect: Dialect,
    pub phone_number: String,
}

impl FileEndpointConfig {
    /// Convert into a catalog endpoint with a stable, name-derived id
    pub fn to_endpoint(&self) -> Result<Endpoint, DomainError> {
        let id = EndpointId::new(format!("{}{}", CONFIG_ENDPOINT_PREFIX, self.name.trim()));
        Endpoint::create(
            id,
            NewEndpoint {
                name: self.name.clone(),
                phone_number: self.phone_number.clone(),
                callback_url: self.callback_url.clone(),
                dialect: self.dialect,
            },
            0,
        )
    }
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub behavior: FileBehaviorConfig,
    pub catalog: FileCatalogConfig,
    pub logging: FileLoggingConfig,
    pub endpoints: Vec<FileEndpointConfig>,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.behavior.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        self.static_endpoints().map(|_| ())
    }

    /// Convert to application-level behavior config
    pub fn behavior_config(&self) -> BehaviorConfig {
        BehaviorConfig::with_timeout_seconds(self.behavior.timeout_seconds)
    }

    /// Endpoints declared under `[[endpoints]]`, validated
    pub fn static_endpoints(&self) -> Result<Vec<Endpoint>, ConfigValidationError> {
        let mut seen = HashSet::new();
        self.endpoints
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let endpoint = entry
                    .to_endpoint()
                    .map_err(|source| ConfigValidationError::InvalidEndpoint { index, source })?;
                if !seen.insert(endpoint.name.to_ascii_lowercase()) {
                    return Err(ConfigValidationError::DuplicateEndpoint(endpoint.name));
                }
                Ok(endpoint)
            })
            .collect()
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
