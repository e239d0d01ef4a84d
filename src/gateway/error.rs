//! Gateway API error types
//!
//! This module defines error types specific to the gateway API and their
//! mapping onto HTTP status codes and JSON error bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::workflow::WorkflowError;

/// Result type for gateway API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway API error types
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Caller's organization may not run the operation
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Referenced function or asset does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Asset state rejects the operation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub message: String,

    /// Optional detailed error information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match &self {
            ApiError::Authentication(msg) => (
                StatusCode::UNAUTHORIZED,
                "Authentication failed".to_string(),
                Some(msg.clone()),
            ),
            ApiError::Authorization(msg) => (
                StatusCode::FORBIDDEN,
                "Insufficient permissions".to_string(),
                Some(msg.clone()),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "Bad request".to_string(),
                Some(msg.clone()),
            ),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "Resource not found".to_string(),
                Some(msg.clone()),
            ),
            ApiError::Conflict(msg) => (
                StatusCode::CONFLICT,
                "Operation rejected".to_string(),
                Some(msg.clone()),
            ),
            ApiError::Io(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO error".to_string(),
                Some(e.to_string()),
            ),
            ApiError::Serialization(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Serialization error".to_string(),
                Some(e.to_string()),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(msg.clone()),
            ),
        };

        let error_response = ErrorResponse { message, details };
        (status, Json(error_response)).into_response()
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::AccessDenied(_) => ApiError::Authorization(err.to_string()),
            WorkflowError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            WorkflowError::UnknownFunction(_) => ApiError::NotFound(err.to_string()),
            WorkflowError::Arity { .. } | WorkflowError::InvalidArgument(_) => {
                ApiError::BadRequest(err.to_string())
            }
            WorkflowError::Duplicate { .. } | WorkflowError::Conflict(_) => {
                ApiError::Conflict(err.to_string())
            }
            WorkflowError::Serialization(_) | WorkflowError::Store(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}
