//! Configuration module
//!
//! Gateway configuration loading and validation.

pub mod config;
pub mod defaults;

pub use config::GatewayConfig;

/// Prefix for configuration environment variables
pub const ENV_PREFIX: &str = "BSN_";
