//! Gateway API Request Handlers
//!
//! This module implements all HTTP request handlers for the gateway API.

use axum::{
    extract::{Extension, Form, Path, Query, State},
    response::{IntoResponse, Json},
};
use chrono::Utc;

use crate::network::{self, Org};
use crate::workflow::{Caller, WorkflowEngine};

use super::auth::Identity;
use super::error::{ApiError, ApiResult};
use super::server::AppState;
use super::types::{InvokeRequest, InvokeResponse, LoginRequest, LoginResponse, QueryParams};

/// Health check endpoint (no auth required)
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Enroll an identity and issue an access token
///
/// Login enrolls rather than authenticates: any password is accepted for a
/// known organization, matching the network's enrollment flow.
pub async fn login(
    State(state): State<AppState>,
    Form(request): Form<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let org = Org::from_str(&request.org_name)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    log::debug!(
        "Enrolling {} under {}; password is not verified",
        request.username,
        org
    );

    let identity = Identity {
        username: request.username.clone(),
        org,
    };

    let token = state.auth.issue_token(identity)?;
    log::info!("User {} logged in under {}", request.username, org);

    Ok(Json(LoginResponse { token }))
}

/// Invoke a chaincode transaction
pub async fn invoke_chaincode(
    State(state): State<AppState>,
    Path(function): Path<String>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<InvokeRequest>,
) -> ApiResult<Json<InvokeResponse>> {
    check_ccversion(&request.ccversion)?;

    let caller = Caller::member_of(identity.org);
    let message = state.engine.invoke(&caller, &function, &request.args)?;

    log::info!(
        "User {} ({}) invoked {}",
        identity.username,
        identity.org,
        function
    );

    Ok(Json(InvokeResponse { message }))
}

/// Run a chaincode query
///
/// The browser console submitted queries as GET with at most one argument in
/// the query string; only `get*` functions are reachable this way.
pub async fn query_chaincode(
    State(state): State<AppState>,
    Path(function): Path<String>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<QueryParams>,
) -> ApiResult<Json<InvokeResponse>> {
    check_ccversion(&params.ccversion)?;

    if !WorkflowEngine::is_query(&function) {
        return Err(ApiError::BadRequest(format!(
            "{} is not a query function",
            function
        )));
    }

    let args: Vec<String> = params
        .args
        .into_iter()
        .filter(|arg| !arg.is_empty())
        .collect();

    let caller = Caller::member_of(identity.org);
    let message = state.engine.invoke(&caller, &function, &args)?;

    log::info!(
        "User {} ({}) queried {}",
        identity.username,
        identity.org,
        function
    );

    Ok(Json(InvokeResponse { message }))
}

fn check_ccversion(ccversion: &str) -> ApiResult<()> {
    if ccversion != network::CHAINCODE_VERSION {
        return Err(ApiError::BadRequest(format!(
            "Unknown chaincode version: {}. Deployed version is {}",
            ccversion,
            network::CHAINCODE_VERSION
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_ccversion() {
        assert!(check_ccversion("v0").is_ok());
        assert!(check_ccversion("v1").is_err());
    }
}
