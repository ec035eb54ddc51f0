//! Handlers for the `/tools` resource: catalog CRUD plus the install/run
//! action gate in front of the job runner.
//!
//! All gating happens here, synchronously, before a job is scheduled: a
//! rejected action returns immediately and no terminal event is ever
//! published for it. The accepted install/run actions return 202 right
//! after handing the job to the runner; progress is observable only on the
//! `/ws/terminal` stream.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fuzzhub_core::error::CoreError;
use fuzzhub_core::types::DbId;
use fuzzhub_registry::tool::{NewTool, Tool, ToolConfigUpdate};
use fuzzhub_runner::JobRequest;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PATCH /tools/{id}/install`. An absent command falls
/// back to the tool's configured `installCommand`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallToolRequest {
    pub install_command: Option<String>,
}

/// Request body for `POST /tools/{id}/run`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunToolRequest {
    /// Command override; defaults to the tool's configured `runCommand`.
    pub command: Option<String>,
    /// Working directory for the child process, typically a project path.
    pub project_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a tool or fail with 404.
async fn find_tool(state: &AppState, id: DbId) -> AppResult<Tool> {
    state
        .tools
        .get(id)
        .await
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Tool", id }))
}

/// Pick the effective command: the request override if present, otherwise
/// the tool's configured default. Blank commands are rejected — a job must
/// have something to execute.
fn effective_command(
    override_command: Option<String>,
    configured: &Option<String>,
    action: &str,
) -> AppResult<String> {
    let command = override_command
        .or_else(|| configured.clone())
        .unwrap_or_default();

    if command.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Tool has no {action} command configured"
        ))));
    }
    Ok(command)
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// GET /api/v1/tools
///
/// List the tool catalog. Any authenticated user may browse it.
pub async fn list_tools(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Tool>>>> {
    let tools = state.tools.list().await;
    Ok(Json(DataResponse { data: tools }))
}

/// POST /api/v1/tools
///
/// Register a new tool. Admin only.
pub async fn create_tool(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(mut input): Json<NewTool>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Tool name must not be empty".into(),
        )));
    }

    input.owner_id = Some(admin.user_id);
    let tool = state.tools.create(input).await;

    tracing::info!(tool_id = tool.id, name = %tool.name, "Tool registered");
    Ok((StatusCode::CREATED, Json(DataResponse { data: tool })))
}

/// PATCH /api/v1/tools/{id}/configure
///
/// Update a tool's commands/description. Admin only.
pub async fn configure_tool(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(tool_id): Path<DbId>,
    Json(update): Json<ToolConfigUpdate>,
) -> AppResult<Json<DataResponse<Tool>>> {
    let tool = state.tools.update_config(tool_id, update).await?;

    tracing::info!(tool_id, "Tool configuration updated");
    Ok(Json(DataResponse { data: tool }))
}

// ---------------------------------------------------------------------------
// Actions (gate in front of the job runner)
// ---------------------------------------------------------------------------

/// PATCH /api/v1/tools/{id}/install
///
/// Start a detached install job for the tool and return 202 immediately.
/// Admin only. The job's output streams on `/ws/terminal`; on success the
/// tool's `installed` flag flips to true.
pub async fn install_tool(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(tool_id): Path<DbId>,
    Json(input): Json<InstallToolRequest>,
) -> AppResult<impl IntoResponse> {
    let tool = find_tool(&state, tool_id).await?;
    let command = effective_command(input.install_command, &tool.install_command, "install")?;

    tracing::info!(tool_id, user_id = admin.user_id, "Install job accepted");
    state.runner.start(JobRequest::install(tool_id, command));

    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: tool })))
}

/// POST /api/v1/tools/{id}/run
///
/// Start a detached run job for an installed tool and return 202
/// immediately. Admin only; rejected with 400 if the tool has not been
/// installed.
pub async fn run_tool(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(tool_id): Path<DbId>,
    Json(input): Json<RunToolRequest>,
) -> AppResult<impl IntoResponse> {
    let tool = find_tool(&state, tool_id).await?;

    if !tool.installed {
        return Err(AppError::Core(CoreError::Validation(
            "Tool is not installed".into(),
        )));
    }

    let command = effective_command(input.command, &tool.run_command, "run")?;
    let working_dir = input.project_path.map(Into::into);

    tracing::info!(tool_id, user_id = admin.user_id, "Run job accepted");
    state
        .runner
        .start(JobRequest::run(tool_id, command, working_dir));

    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: tool })))
}

/// DELETE /api/v1/tools/{id}/uninstall
///
/// Clear a tool's `installed` flag. Admin only; rejected with 400 if the
/// tool is not installed. No host-side cleanup command is executed.
pub async fn uninstall_tool(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(tool_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Tool>>> {
    let tool = find_tool(&state, tool_id).await?;

    if !tool.installed {
        return Err(AppError::Core(CoreError::Validation(
            "Tool is not installed".into(),
        )));
    }

    let tool = state.tools.set_installed(tool_id, false).await?;

    tracing::info!(tool_id, "Tool uninstalled");
    Ok(Json(DataResponse { data: tool }))
}

/// GET /api/v1/tools/{id}/install-status
///
/// Poll a tool's installation state: `completed` once the `installed` flag
/// is set, `pending` before that.
pub async fn install_status(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(tool_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let tool = find_tool(&state, tool_id).await?;

    let status = if tool.installed { "completed" } else { "pending" };
    Ok(Json(serde_json::json!({ "status": status })))
}
