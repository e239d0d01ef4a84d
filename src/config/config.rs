//! Configuration structures and methods
//!
//! This module defines the gateway configuration structure and related
//! methods for loading configuration from different sources (command-line
//! arguments, environment variables, and configuration files).

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::common::{GatewayError, Result};
use crate::config::defaults;

/// Gateway configuration
///
/// Contains all configuration options needed for the gateway server.
/// Supports loading from command-line arguments, environment variables,
/// and configuration files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listen address for the gateway server
    #[serde(default = "defaults::listen")]
    pub listen: SocketAddr,

    /// Log level (debug, info, warn, error)
    #[serde(default = "defaults::log_level")]
    pub log_level: String,

    /// Environment name (development, testing, production)
    #[serde(default = "defaults::environment")]
    pub environment: String,

    /// Whether the workflow engine skips organization gates
    /// Intended for local development only; never enable in production
    #[serde(default = "defaults::dev_mode")]
    pub dev_mode: bool,

    /// Lifetime of issued access tokens in seconds
    #[serde(default = "defaults::token_ttl_secs")]
    pub token_ttl_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen: defaults::listen(),
            log_level: defaults::log_level(),
            environment: defaults::environment(),
            dev_mode: defaults::dev_mode(),
            token_ttl_secs: defaults::token_ttl_secs(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            GatewayError::Config(format!("Failed to read configuration file: {}", e))
        })?;

        serde_json::from_str(&text).map_err(|e| {
            GatewayError::Config(format!("Failed to parse configuration file: {}", e))
        })
    }

    /// Merge another configuration into this one
    ///
    /// Values from `other` override values in `self` when they differ from
    /// the defaults. This implements the configuration priority system:
    /// defaults, then environment file, then explicit file, then flags.
    pub fn merge(mut self, other: GatewayConfig) -> Self {
        let base = GatewayConfig::default();

        if other.listen != base.listen {
            self.listen = other.listen;
        }
        if other.log_level != base.log_level {
            self.log_level = other.log_level;
        }
        if other.environment != base.environment {
            self.environment = other.environment;
        }
        if other.dev_mode != base.dev_mode {
            self.dev_mode = other.dev_mode;
        }
        if other.token_ttl_secs != base.token_ttl_secs {
            self.token_ttl_secs = other.token_ttl_secs;
        }

        self
    }

    /// Validate the final configuration
    pub fn validate(&self) -> Result<()> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(GatewayError::Config(format!(
                    "Invalid log level: {}. Valid values are: trace, debug, info, warn, error",
                    other
                )))
            }
        }

        if self.token_ttl_secs == 0 {
            return Err(GatewayError::Config(
                "Token TTL must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
