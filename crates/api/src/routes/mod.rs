pub mod admin;
pub mod auth;
pub mod health;
pub mod tools;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws/terminal                         terminal event WebSocket
///
/// /auth/login                          login (public)
/// /auth/logout                         logout (requires auth)
/// /auth/me                             current user (requires auth)
/// /auth/switch-role                    demo role switch (requires auth)
///
/// /tools                               list (auth), create (admin)
/// /tools/{id}/install                  start install job (admin)
/// /tools/{id}/run                      start run job (admin, installed)
/// /tools/{id}/configure                update commands (admin)
/// /tools/{id}/uninstall                clear installed flag (admin)
/// /tools/{id}/install-status           poll install state (auth)
///
/// /admin/users                         list, create (admin only)
/// /admin/users/{id}/role               change role (admin only)
/// /admin/users/{id}                    delete (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Terminal WebSocket endpoint.
        .route("/ws/terminal", get(ws::terminal_ws_handler))
        // Authentication routes.
        .nest("/auth", auth::router())
        // Tool catalog and the install/run action gate.
        .nest("/tools", tools::router())
        // Admin user management.
        .nest("/admin", admin::router())
}
