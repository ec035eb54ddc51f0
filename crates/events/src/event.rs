//! Terminal event records.

use fuzzhub_core::types::JobId;
use serde::{Deserialize, Serialize};

/// Kind of a terminal event.
///
/// The runner produces `start`, `stdout`, `stderr`, `success`, `error`, and
/// `end`; the hub itself produces `subscribed` as the subscription
/// acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Start,
    Stdout,
    Stderr,
    Success,
    Error,
    End,
    Subscribed,
}

/// An immutable terminal event.
///
/// Wire shape: `{"type": "...", "jobId": ..., "message": "..."}`. Events
/// are fire-and-forget; there is no replay buffer, so an event published
/// with no subscribers is gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(rename = "jobId")]
    pub job_id: JobId,
    pub message: String,
}

impl TerminalEvent {
    pub fn new(kind: EventKind, job_id: JobId, message: impl Into<String>) -> Self {
        Self {
            kind,
            job_id,
            message: message.into(),
        }
    }

    pub fn start(job_id: JobId, message: impl Into<String>) -> Self {
        Self::new(EventKind::Start, job_id, message)
    }

    pub fn stdout(job_id: JobId, message: impl Into<String>) -> Self {
        Self::new(EventKind::Stdout, job_id, message)
    }

    pub fn stderr(job_id: JobId, message: impl Into<String>) -> Self {
        Self::new(EventKind::Stderr, job_id, message)
    }

    pub fn success(job_id: JobId, message: impl Into<String>) -> Self {
        Self::new(EventKind::Success, job_id, message)
    }

    pub fn error(job_id: JobId, message: impl Into<String>) -> Self {
        Self::new(EventKind::Error, job_id, message)
    }

    pub fn end(job_id: JobId, message: impl Into<String>) -> Self {
        Self::new(EventKind::End, job_id, message)
    }

    /// The acknowledgment the hub sends on a successful subscribe.
    pub fn subscribed(job_id: JobId) -> Self {
        Self::new(
            EventKind::Subscribed,
            job_id,
            format!("Connected to terminal for tool {job_id}\n"),
        )
    }

    /// Whether this event logically terminates the stream for its job.
    pub fn is_terminal(&self) -> bool {
        self.kind == EventKind::End
    }
}
