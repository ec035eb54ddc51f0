//! Handlers for the `/admin` resource (user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fuzzhub_core::error::CoreError;
use fuzzhub_core::roles::ROLE_USER;
use fuzzhub_core::types::DbId;
use fuzzhub_registry::user::{NewUser, PublicUser};
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

/// Request body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
///
/// List all accounts with password hashes stripped.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Json<Vec<PublicUser>> {
    let users = state.users.list().await;
    Json(users.iter().map(|u| u.to_public()).collect())
}

/// POST /api/v1/admin/users
///
/// Create an account. Validates password strength, hashes it, and returns
/// the public projection with 201 Created.
pub async fn create_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<PublicUser>)> {
    if input.email.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Email must not be empty".into(),
        )));
    }

    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .users
        .create(NewUser {
            email: input.email,
            password_hash: hashed,
            first_name: input.first_name,
            last_name: input.last_name,
            role: input.role.unwrap_or_else(|| ROLE_USER.to_string()),
        })
        .await?;

    tracing::info!(user_id = user.id, email = %user.email, "User created");
    Ok((StatusCode::CREATED, Json(user.to_public())))
}

/// PUT /api/v1/admin/users/{id}/role
///
/// Change an account's role.
pub async fn update_user_role(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<UpdateRoleRequest>,
) -> AppResult<Json<PublicUser>> {
    let user = state.users.update_role(user_id, &input.role).await?;

    tracing::info!(user_id, role = %user.role, "User role updated");
    Ok(Json(user.to_public()))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Delete an account. Admins cannot delete their own account.
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    if admin.user_id == user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot delete your own account".into(),
        )));
    }

    state.users.delete(user_id).await?;

    tracing::info!(user_id, "User deleted");
    Ok(Json(serde_json::json!({ "message": "User deleted successfully" })))
}
