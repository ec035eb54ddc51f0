//! HTTP-level integration tests for authentication and role handling.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, post_json_auth};

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns 200 with an access token and public user info.
#[tokio::test]
async fn login_success_returns_token_and_user() {
    let state = common::test_state().await;
    let app = common::test_app(&state);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": common::ADMIN_EMAIL, "password": common::ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["expires_in"].is_number());
    assert_eq!(json["user"]["email"], common::ADMIN_EMAIL);
    assert_eq!(json["user"]["role"], "admin");
    // The password hash must never appear in a response.
    assert!(json["user"].get("passwordHash").is_none());
}

/// Login with an incorrect password returns 401.
#[tokio::test]
async fn login_wrong_password_is_unauthorized() {
    let state = common::test_state().await;
    let app = common::test_app(&state);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": common::ADMIN_EMAIL, "password": "not-the-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Login with an unknown email returns 401 with the same message shape as a
/// bad password, so the endpoint does not leak which emails exist.
#[tokio::test]
async fn login_unknown_email_is_unauthorized() {
    let state = common::test_state().await;
    let app = common::test_app(&state);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "ghost@test.com", "password": "whatever" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid email or password");
}

// ---------------------------------------------------------------------------
// Authenticated endpoints
// ---------------------------------------------------------------------------

/// `/auth/me` without a token is 401; with a token it returns the caller.
#[tokio::test]
async fn me_requires_and_honors_the_token() {
    let state = common::test_state().await;
    let app = common::test_app(&state);

    let response = common::get(app.clone(), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = common::login(app.clone(), common::USER_EMAIL, common::USER_PASSWORD).await;
    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["email"], common::USER_EMAIL);
    assert_eq!(json["role"], "user");
}

/// A garbage bearer token is rejected.
#[tokio::test]
async fn malformed_token_is_unauthorized() {
    let state = common::test_state().await;
    let app = common::test_app(&state);

    let response = get_auth(app, "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout acknowledges an authenticated caller.
#[tokio::test]
async fn logout_acknowledges() {
    let state = common::test_state().await;
    let app = common::test_app(&state);
    let token = common::login(app.clone(), common::USER_EMAIL, common::USER_PASSWORD).await;

    let response =
        post_json_auth(app, "/api/v1/auth/logout", &token, serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Logout successful");
}

// ---------------------------------------------------------------------------
// Role switch (demo feature)
// ---------------------------------------------------------------------------

/// Switching an admin to `user` yields a token the admin gate rejects.
#[tokio::test]
async fn switched_token_carries_the_new_role() {
    let state = common::test_state().await;
    let app = common::test_app(&state);
    let admin_token = common::login(app.clone(), common::ADMIN_EMAIL, common::ADMIN_PASSWORD).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/auth/switch-role",
        &admin_token,
        serde_json::json!({ "role": "user" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["role"], "user");
    let demoted_token = json["access_token"].as_str().unwrap().to_string();

    // The demoted token cannot pass the admin gate anymore.
    let response = common::patch_json_auth(
        app,
        "/api/v1/tools/1/install",
        &demoted_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Switching to an unknown role is rejected.
#[tokio::test]
async fn switch_to_unknown_role_is_rejected() {
    let state = common::test_state().await;
    let app = common::test_app(&state);
    let token = common::login(app.clone(), common::USER_EMAIL, common::USER_PASSWORD).await;

    let response = post_json_auth(
        app,
        "/api/v1/auth/switch-role",
        &token,
        serde_json::json!({ "role": "superuser" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
