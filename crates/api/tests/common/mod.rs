//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the full application router with the same middleware stack as
//! production, backed by a freshly seeded in-memory state, and provides
//! small request helpers around `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use fuzzhub_api::auth::jwt::JwtConfig;
use fuzzhub_api::auth::password::hash_password;
use fuzzhub_api::config::{BootstrapConfig, ServerConfig};
use fuzzhub_api::router::build_app_router;
use fuzzhub_api::state::AppState;
use fuzzhub_events::TerminalHub;
use fuzzhub_registry::{NewUser, ToolRegistry, UserDirectory};
use fuzzhub_runner::JobRunner;

pub const ADMIN_EMAIL: &str = "admin@test.com";
pub const ADMIN_PASSWORD: &str = "admin-pass-123";
pub const USER_EMAIL: &str = "user@test.com";
pub const USER_PASSWORD: &str = "user-pass-123";

/// Build a test `ServerConfig` with a fixed JWT secret and safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 60,
        },
        bootstrap: BootstrapConfig {
            admin_email: ADMIN_EMAIL.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
            user_email: USER_EMAIL.to_string(),
            user_password: USER_PASSWORD.to_string(),
        },
    }
}

/// Build a fully wired `AppState`: default tool catalog, the two bootstrap
/// accounts, an empty hub, and a runner attached to both.
pub async fn test_state() -> AppState {
    let config = test_config();

    let tools = Arc::new(ToolRegistry::with_default_catalog().await);
    let users = Arc::new(UserDirectory::new());
    for (email, password, role) in [
        (ADMIN_EMAIL, ADMIN_PASSWORD, fuzzhub_core::roles::ROLE_ADMIN),
        (USER_EMAIL, USER_PASSWORD, fuzzhub_core::roles::ROLE_USER),
    ] {
        users
            .create(NewUser {
                email: email.to_string(),
                password_hash: hash_password(password).expect("hashing should succeed"),
                first_name: None,
                last_name: None,
                role: role.to_string(),
            })
            .await
            .expect("seeding test accounts should succeed");
    }

    let hub = Arc::new(TerminalHub::new());
    let runner = Arc::new(JobRunner::new(Arc::clone(&hub), Arc::clone(&tools)));

    AppState {
        config: Arc::new(config),
        tools,
        users,
        hub,
        runner,
    }
}

/// Build the application router over the given state, mirroring `main.rs`
/// so tests exercise the production middleware stack.
pub fn test_app(state: &AppState) -> Router {
    let config = state.config.as_ref().clone();
    build_app_router(state.clone(), &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Log in through the API and return the access token.
pub async fn login(app: Router, email: &str, password: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    json["access_token"]
        .as_str()
        .expect("login response must contain access_token")
        .to_string()
}
