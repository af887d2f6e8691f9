//! Configuration for the query client

use crate::query::ConsistencyLevel;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod loader;
pub mod validation;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Meridian server URL
    pub endpoint: String,

    /// Static API token (optional, secured); ignored when a token
    /// provider is installed on the transport
    #[serde(
        default,
        serialize_with = "serialize_optional_secret",
        deserialize_with = "deserialize_optional_secret"
    )]
    pub api_token: Option<Secret<String>>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Default consistency level applied by callers that do not set one
    #[serde(default)]
    pub consistency_level: Option<ConsistencyLevel>,

    /// Default pagination page size
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Refresh tokens this many seconds before they expire
    #[serde(default = "default_refresh_margin")]
    pub token_refresh_margin_secs: i64,
}

// Default value functions
fn default_timeout() -> u64 { 30 }
fn default_page_size() -> u32 { 100 }
fn default_tls_verify() -> bool { true }
fn default_refresh_margin() -> i64 { 30 }

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let config = loader::load_config(path)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let config = loader::load_config_with_env(path)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Validate this configuration
    pub fn validate(&self) -> crate::error::Result<()> {
        validation::validate_config(self)
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Self {
            endpoint: "http://localhost:9055".to_string(),
            api_token: None,
            timeout_secs: default_timeout(),
            consistency_level: None,
            page_size: default_page_size(),
            tls_verify: default_tls_verify(),
            token_refresh_margin_secs: default_refresh_margin(),
        }
    }
}

/// Custom serializer for Option<Secret<String>>
fn serialize_optional_secret<S>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Custom deserializer for Option<Secret<String>>
fn deserialize_optional_secret<'de, D>(deserializer: D) -> Result<Option<Secret<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.map(Secret::new))
}
