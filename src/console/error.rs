//! Console error types

use thiserror::Error;

use crate::common::GatewayError;

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Role console error types
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway rejected the request
    #[error("Gateway error ({status}): {message}")]
    Gateway { status: u16, message: String },

    /// Session file missing, unreadable, or expired
    #[error("Session error: {0}")]
    Session(String),

    /// Operation not on the role's menu
    #[error("Operation {name} not available to {org}")]
    UnknownOperation { org: String, name: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<GatewayError> for ConsoleError {
    fn from(err: GatewayError) -> Self {
        ConsoleError::Config(err.to_string())
    }
}
