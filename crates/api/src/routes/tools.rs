//! Route definitions for the `/tools` resource.
//!
//! Listing and status polling require authentication; every action that
//! reaches the job runner (install, run, configure, uninstall) requires the
//! `admin` role, enforced in the handlers.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::tools;
use crate::state::AppState;

/// Routes mounted at `/tools`.
///
/// ```text
/// GET    /                       -> list_tools
/// POST   /                       -> create_tool
/// PATCH  /{id}/install           -> install_tool
/// POST   /{id}/run               -> run_tool
/// PATCH  /{id}/configure         -> configure_tool
/// DELETE /{id}/uninstall         -> uninstall_tool
/// GET    /{id}/install-status    -> install_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tools::list_tools).post(tools::create_tool))
        .route("/{id}/install", patch(tools::install_tool))
        .route("/{id}/run", post(tools::run_tool))
        .route("/{id}/configure", patch(tools::configure_tool))
        .route("/{id}/uninstall", delete(tools::uninstall_tool))
        .route("/{id}/install-status", get(tools::install_status))
}
