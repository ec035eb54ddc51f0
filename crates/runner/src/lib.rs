//! Detached execution of tool install/run commands.
//!
//! [`JobRunner::start`] schedules a shell command as a child process and
//! returns immediately; the job's lifecycle is narrated exclusively through
//! [`fuzzhub_events::TerminalEvent`]s published to the hub. There is no
//! handle to await and no cancellation: once started, a job runs until its
//! process exits.

pub mod job;
pub mod runner;

pub use job::{JobKind, JobRequest};
pub use runner::JobRunner;
