//! Integration tests for gateway API endpoints
//!
//! Drives the router directly: login and token issuance, bearer
//! authentication, and the chaincode invoke/query endpoints.

use axum::body::Body;
use axum::Router;
use http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use bsn_gateway::config::GatewayConfig;
use bsn_gateway::gateway::{build_router, AppState};

fn test_router() -> Router {
    build_router(AppState::from_config(&GatewayConfig::default()))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(app: &Router, username: &str, org: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from(format!(
                    "username={}&password=pw&orgName={}",
                    username, org
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["token"].as_str().unwrap().to_string()
}

async fn invoke(
    app: &Router,
    token: &str,
    function: &str,
    args: Vec<&str>,
) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/chaincode/{}", function))
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(
                    json!({"ccversion": "v0", "args": args}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn test_health_check() {
    let app = test_router();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_login_issues_token() {
    let app = test_router();
    let token = login(&app, "alice", "userorg").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_login_rejects_unknown_org() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from("username=alice&password=pw&orgName=ordererorg"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chaincode_requires_token() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chaincode/registerBike")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"ccversion": "v0", "args": ["b1"]}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_chaincode_rejects_bad_token() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chaincode/registerBike")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, "Bearer forged")
                .body(Body::from(json!({"ccversion": "v0", "args": ["b1"]}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invoke_runs_workflow_operation() {
    let app = test_router();
    let token = login(&app, "admin", "providerorg").await;

    let (status, body) = invoke(&app, &token, "registerBike", vec!["b1"]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Bike b1 registered.");

    // Duplicate registration surfaces the workflow conflict
    let (status, body) = invoke(&app, &token, "registerBike", vec!["b1"]).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"], "Bike b1 already registered.");
}

#[tokio::test]
async fn test_invoke_enforces_org_gate() {
    let app = test_router();
    let token = login(&app, "admin", "providerorg").await;

    let (status, body) = invoke(&app, &token, "registerUser", vec!["alice", "10000"]).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["details"],
        "Caller not a member of User Org. Access denied."
    );
}

#[tokio::test]
async fn test_invoke_rejects_wrong_ccversion() {
    let app = test_router();
    let token = login(&app, "admin", "providerorg").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chaincode/registerBike")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(json!({"ccversion": "v9", "args": ["b1"]}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_query_returns_ledger_records() {
    let app = test_router();
    let provider = login(&app, "admin", "providerorg").await;

    invoke(&app, &provider, "registerBike", vec!["b1"]).await;
    invoke(&app, &provider, "registerBike", vec!["b2"]).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/chaincode/getBikes?ccversion=v0&args=")
                .header(header::AUTHORIZATION, format!("Bearer {}", provider))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let records: Value = serde_json::from_str(body["message"].as_str().unwrap()).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 2);
    assert_eq!(records[0]["Value"]["docType"], "bike");
}

#[tokio::test]
async fn test_query_with_single_argument() {
    let app = test_router();
    let provider = login(&app, "admin", "providerorg").await;

    invoke(&app, &provider, "registerBike", vec!["b1"]).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/chaincode/getBikeById?ccversion=v0&args=b1")
                .header(header::AUTHORIZATION, format!("Bearer {}", provider))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let records: Value = serde_json::from_str(body["message"].as_str().unwrap()).unwrap();
    assert_eq!(records[0]["Value"]["id"], "b1");
}

#[tokio::test]
async fn test_get_cannot_reach_mutations() {
    let app = test_router();
    let provider = login(&app, "admin", "providerorg").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/chaincode/discardBike?ccversion=v0&args=b1")
                .header(header::AUTHORIZATION, format!("Bearer {}", provider))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_login_can_register_and_ride() {
    let app = test_router();
    let provider = login(&app, "admin", "providerorg").await;
    invoke(&app, &provider, "registerBike", vec!["b1"]).await;

    // The console registers non-admin users right after login
    let user = login(&app, "alice", "userorg").await;
    let (status, body) = invoke(&app, &user, "registerUser", vec!["alice", "10000"]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User alice registered.");

    let (status, body) = invoke(&app, &user, "startRide", vec!["alice", "b1", "13.4", "52.5"]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().starts_with("Ride alice-b1-"));
}
