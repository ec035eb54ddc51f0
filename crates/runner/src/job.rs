//! Job descriptions and per-kind lifecycle messages.

use std::path::PathBuf;

use fuzzhub_core::types::JobId;

/// What a job is doing to its tool. Install jobs are the only ones that
/// write back durable state (the `installed` flag, on success).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Install,
    Run,
}

impl JobKind {
    pub(crate) fn start_message(self, tool_name: &str) -> String {
        match self {
            JobKind::Install => format!("Starting installation of {tool_name}...\n"),
            JobKind::Run => format!("Starting {tool_name}...\n"),
        }
    }

    pub(crate) fn success_message(self, tool_name: &str) -> String {
        match self {
            JobKind::Install => format!("{tool_name} installed successfully!\n"),
            JobKind::Run => format!("{tool_name} completed successfully!\n"),
        }
    }

    pub(crate) fn failure_message(self, exit_code: i32) -> String {
        match self {
            JobKind::Install => format!("Installation failed with exit code: {exit_code}\n"),
            JobKind::Run => format!("Execution failed with exit code: {exit_code}\n"),
        }
    }

    pub(crate) fn end_message(self) -> &'static str {
        match self {
            JobKind::Install => "Installation process completed.\n",
            JobKind::Run => "Tool execution completed.\n",
        }
    }
}

/// A request to execute one shell command for one tool.
#[derive(Debug, Clone)]
pub struct JobRequest {
    /// Job id; reused from the owning tool's id.
    pub job_id: JobId,
    /// Shell command executed via `sh -c`.
    pub command: String,
    /// Working directory for the child, typically a project path.
    pub working_dir: Option<PathBuf>,
    pub kind: JobKind,
}

impl JobRequest {
    pub fn install(job_id: JobId, command: impl Into<String>) -> Self {
        Self {
            job_id,
            command: command.into(),
            working_dir: None,
            kind: JobKind::Install,
        }
    }

    pub fn run(job_id: JobId, command: impl Into<String>, working_dir: Option<PathBuf>) -> Self {
        Self {
            job_id,
            command: command.into(),
            working_dir,
            kind: JobKind::Run,
        }
    }
}
