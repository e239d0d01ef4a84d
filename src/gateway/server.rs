//! Gateway HTTP Server Module
//!
//! This module sets up the HTTP server for the gateway API using axum.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::workflow::WorkflowEngine;

use super::auth::{auth_middleware, AuthState};
use super::error::ApiResult;
use super::handlers;

/// State shared by all gateway handlers
#[derive(Clone)]
pub struct AppState {
    /// Workflow engine executing the business logic
    pub engine: Arc<WorkflowEngine>,

    /// Token issuance and validation state
    pub auth: AuthState,
}

impl AppState {
    /// Build the shared state from a configuration
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            engine: Arc::new(WorkflowEngine::in_memory(config.dev_mode)),
            auth: AuthState::new(config.token_ttl_secs),
        }
    }
}

/// Start the gateway HTTP server
pub async fn start_gateway(config: GatewayConfig) -> ApiResult<()> {
    let state = AppState::from_config(&config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    log::info!("Gateway API server listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    // Chaincode routes require a valid bearer token
    let chaincode_router = Router::new()
        .route(
            "/:function",
            get(handlers::query_chaincode).post(handlers::invoke_chaincode),
        )
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ));

    Router::new()
        // Public routes (no authentication required)
        .route("/health", get(handlers::health_check))
        .route("/login", post(handlers::login))

        // Protected chaincode routes
        .nest("/chaincode", chaincode_router)

        // Add tracing to all routes
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
