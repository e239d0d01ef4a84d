//! Workflow error types
//!
//! Errors raised by the workflow engine. Display strings keep the message
//! shapes the browser console shows verbatim in its result box.

use thiserror::Error;

/// Result type for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Asset kind named in not-found and duplicate errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    User,
    Repairer,
    Bike,
    Ride,
    Issue,
    Repair,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AssetKind::User => "User",
            AssetKind::Repairer => "Repairer",
            AssetKind::Bike => "Bike",
            AssetKind::Ride => "Ride",
            AssetKind::Issue => "Issue",
            AssetKind::Repair => "Repair",
        };
        write!(f, "{}", name)
    }
}

/// Workflow engine error types
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Caller's organization is not allowed to run the operation
    #[error("Caller not a member of {0} Org. Access denied.")]
    AccessDenied(String),

    /// Wrong number of positional arguments
    #[error("Incorrect number of arguments. Expecting {expected}: {{{hint}}}. Found {found}.")]
    Arity {
        expected: usize,
        hint: &'static str,
        found: usize,
    },

    /// Referenced asset does not exist
    #[error("{kind} {id} not found.")]
    NotFound { kind: AssetKind, id: String },

    /// Asset already exists under that id
    #[error("{kind} {id} already {verb}.")]
    Duplicate {
        kind: AssetKind,
        id: String,
        verb: &'static str,
    },

    /// Asset is not in a state the operation accepts
    #[error("{0}")]
    Conflict(String),

    /// Argument failed to parse
    #[error("{0}")]
    InvalidArgument(String),

    /// No operation under that name
    #[error("Invalid invoke function name.")]
    UnknownFunction(String),

    /// Stored document failed to (de)serialize
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// State store failure
    #[error("State store error: {0}")]
    Store(String),
}
