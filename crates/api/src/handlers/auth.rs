//! Handlers for the `/auth` resource (login, logout, me, role switch).
//!
//! Auth is stateless: a login issues a signed access token and nothing is
//! stored server-side. Logout is therefore an acknowledgment only, and the
//! demo role switch reissues the token with the requested role.

use axum::extract::State;
use axum::Json;
use fuzzhub_core::error::CoreError;
use fuzzhub_core::roles;
use fuzzhub_registry::PublicUser;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by login and role switch.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: PublicUser,
}

/// Request body for `POST /auth/switch-role`.
#[derive(Debug, Deserialize)]
pub struct SwitchRoleRequest {
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns an access token and the
/// public user info.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = state
        .users
        .find_by_email(&input.email)
        .await
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: user.to_public(),
    }))
}

/// POST /api/v1/auth/logout
///
/// Stateless acknowledgment; the client discards its token.
pub async fn logout(RequireAuth(user): RequireAuth) -> Json<serde_json::Value> {
    tracing::info!(user_id = user.user_id, "User logged out");
    Json(serde_json::json!({ "message": "Logout successful" }))
}

/// GET /api/v1/auth/me
///
/// Return the authenticated user's public info.
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<PublicUser>> {
    let user = state
        .users
        .get(auth.user_id)
        .await
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(user.to_public()))
}

/// POST /api/v1/auth/switch-role
///
/// Demo feature: reissue the caller's token with the requested role. The
/// directory record keeps its original role; only the token changes.
pub async fn switch_role(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SwitchRoleRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if !roles::is_valid_role(&input.role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid role: {}",
            input.role
        ))));
    }

    let access_token = generate_access_token(auth.user_id, &input.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = auth.user_id, role = %input.role, "Role switched");

    Ok(Json(serde_json::json!({
        "message": format!("Role switched to {}", input.role),
        "role": input.role,
        "access_token": access_token,
    })))
}
