//! Bike Share Network Gateway
//!
//! This library implements the HTTP gateway and role console for a
//! permissioned bike-share network. Operators log in under one of three
//! organizations (user, repairer, provider), receive a bearer token, and
//! submit role-scoped workflow operations; the gateway executes the
//! bike/ride/issue/repair business logic against a pluggable world state.
//!
//! # Main Features
//!
//! - Login and expiring bearer-token issuance per enrolled identity
//! - Org-gated workflow engine covering the full asset lifecycle
//! - Role console with the browser UI's operation menus and dispatch rule
//! - Network identity and endorsement-policy templates for backend use
//!
//! # Example
//!
//! ```no_run
//! use bsn_gateway::config::GatewayConfig;
//! use bsn_gateway::gateway::start_gateway;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = GatewayConfig::default();
//!     if let Err(e) = start_gateway(config).await {
//!         eprintln!("gateway failed: {}", e);
//!     }
//! }
//! ```

// Public modules
pub mod common;
pub mod config;
pub mod console;
pub mod gateway;
pub mod network;
pub mod workflow;

// Re-export commonly used structures and functions for convenience
pub use common::{init_logger, GatewayError, Result};
pub use gateway::start_gateway;
pub use workflow::WorkflowEngine;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
