//! Gateway module
//!
//! HTTP front door of the network: login and token issuance, bearer
//! authentication, and the chaincode invoke/query endpoints the role
//! console talks to.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;
pub mod types;

pub use auth::{AuthState, Identity};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use server::{build_router, start_gateway, AppState};
pub use types::{InvokeRequest, InvokeResponse, LoginRequest, LoginResponse};
