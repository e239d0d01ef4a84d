//! Gateway API data types
//!
//! Request and response bodies exchanged with the role console. Field names
//! match what the browser controllers submitted.

use serde::{Deserialize, Serialize};

/// Login form body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,

    /// Accepted but not verified; login enrolls rather than authenticates
    pub password: String,

    /// Organization name (`userorg`, `repairerorg`, `providerorg`)
    #[serde(rename = "orgName")]
    pub org_name: String,
}

/// Login response carrying the issued bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Body of a chaincode invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeRequest {
    /// Must match the deployed chaincode version
    pub ccversion: String,

    /// Positional arguments in operation order
    #[serde(default)]
    pub args: Vec<String>,
}

/// Query-string form of a chaincode query
#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    pub ccversion: String,

    /// Single optional argument; the browser console sent at most one
    #[serde(default)]
    pub args: Option<String>,
}

/// Result envelope shown by the console
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub message: String,
}
