use std::sync::Arc;

use fuzzhub_events::TerminalHub;
use fuzzhub_registry::{ToolRegistry, UserDirectory};
use fuzzhub_runner::JobRunner;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (consulted by auth middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Security-tool catalog.
    pub tools: Arc<ToolRegistry>,
    /// Dashboard accounts.
    pub users: Arc<UserDirectory>,
    /// Terminal event fan-out, shared with the job runner.
    pub hub: Arc<TerminalHub>,
    /// Detached job executor.
    pub runner: Arc<JobRunner>,
}
