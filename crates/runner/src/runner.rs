//! Job execution: spawn, stream, report.

use std::process::Stdio;
use std::sync::Arc;

use fuzzhub_core::types::JobId;
use fuzzhub_events::{EventKind, TerminalEvent, TerminalHub};
use fuzzhub_registry::ToolRegistry;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::job::{JobKind, JobRequest};

/// Read buffer size for child stdout/stderr. Chunks are forwarded the
/// moment they arrive; this only caps how much one read can carry.
const CHUNK_BUF_BYTES: usize = 8192;

/// Executes tool commands as detached child processes.
///
/// Cheap to share: both collaborators are behind `Arc`. The hub receives
/// every lifecycle event; the registry is read for the tool's display name
/// and written exactly once, when an install job succeeds.
pub struct JobRunner {
    hub: Arc<TerminalHub>,
    registry: Arc<ToolRegistry>,
}

impl JobRunner {
    pub fn new(hub: Arc<TerminalHub>, registry: Arc<ToolRegistry>) -> Self {
        Self { hub, registry }
    }

    /// Start a job and return immediately.
    ///
    /// The caller observes the outcome only through the hub's event stream;
    /// there is no join handle and no cancellation. Calling this again for
    /// the same job id is allowed: the runs interleave their events under
    /// that id.
    pub fn start(&self, request: JobRequest) {
        let hub = Arc::clone(&self.hub);
        let registry = Arc::clone(&self.registry);

        tracing::info!(
            job_id = request.job_id,
            command = %request.command,
            kind = ?request.kind,
            "Starting job"
        );

        tokio::spawn(async move {
            execute(hub, registry, request).await;
        });
    }
}

/// Drive one job from `start` to `end`.
async fn execute(hub: Arc<TerminalHub>, registry: Arc<ToolRegistry>, request: JobRequest) {
    let JobRequest {
        job_id,
        command,
        working_dir,
        kind,
    } = request;

    // The gate verified the tool exists before scheduling; a miss here means
    // it was removed in between, and the job is silently dropped.
    let Some(tool) = registry.get(job_id).await else {
        tracing::warn!(job_id, "Job references unknown tool; skipping");
        return;
    };

    hub.publish(TerminalEvent::start(job_id, kind.start_message(&tool.name)))
        .await;

    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(&command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = &working_dir {
        cmd.current_dir(dir);
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::error!(job_id, error = %e, "Failed to spawn job process");
            hub.publish(TerminalEvent::error(
                job_id,
                format!("Failed to start process: {e}\n"),
            ))
            .await;
            // Still close the stream so clients can tear down uniformly.
            hub.publish(TerminalEvent::end(job_id, kind.end_message()))
                .await;
            return;
        }
    };

    // Forward both pipes chunk-by-chunk while the process runs. Reading
    // concurrently with wait() keeps the child from blocking on a full pipe.
    let stdout_task = tokio::spawn(stream_output(
        Arc::clone(&hub),
        job_id,
        EventKind::Stdout,
        child.stdout.take(),
    ));
    let stderr_task = tokio::spawn(stream_output(
        Arc::clone(&hub),
        job_id,
        EventKind::Stderr,
        child.stderr.take(),
    ));

    let status = child.wait().await;

    // Drain both pipes fully before the terminal events so that every
    // output chunk precedes success/error in publish order.
    let _ = stdout_task.await;
    let _ = stderr_task.await;

    match status {
        Ok(status) if status.success() => {
            if kind == JobKind::Install {
                if let Err(e) = registry.set_installed(job_id, true).await {
                    tracing::error!(job_id, error = %e, "Failed to record install success");
                }
            }
            tracing::info!(job_id, "Job completed successfully");
            hub.publish(TerminalEvent::success(
                job_id,
                kind.success_message(&tool.name),
            ))
            .await;
        }
        Ok(status) => {
            let exit_code = status.code().unwrap_or(-1);
            tracing::warn!(job_id, exit_code, "Job failed");
            hub.publish(TerminalEvent::error(job_id, kind.failure_message(exit_code)))
                .await;
        }
        Err(e) => {
            tracing::error!(job_id, error = %e, "Failed waiting on job process");
            hub.publish(TerminalEvent::error(
                job_id,
                format!("Failed waiting on process: {e}\n"),
            ))
            .await;
        }
    }

    hub.publish(TerminalEvent::end(job_id, kind.end_message()))
        .await;
}

/// Forward one output pipe to the hub, emitting a chunk event per read.
async fn stream_output<R: AsyncRead + Unpin>(
    hub: Arc<TerminalHub>,
    job_id: JobId,
    kind: EventKind,
    pipe: Option<R>,
) {
    let Some(mut pipe) = pipe else { return };
    let mut buf = [0u8; CHUNK_BUF_BYTES];

    loop {
        match pipe.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let chunk = String::from_utf8_lossy(&buf[..n]).into_owned();
                hub.publish(TerminalEvent::new(kind, job_id, chunk)).await;
            }
            Err(e) => {
                tracing::debug!(job_id, error = %e, "Output pipe read error");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use fuzzhub_registry::{NewTool, ToolKind};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    use super::*;

    async fn setup(installed: bool) -> (Arc<TerminalHub>, Arc<ToolRegistry>, JobRunner, i64) {
        let hub = Arc::new(TerminalHub::new());
        let registry = Arc::new(ToolRegistry::new());
        let tool = registry
            .create(NewTool {
                name: "Semgrep".into(),
                kind: ToolKind::Sast,
                description: None,
                install_command: Some("true".into()),
                run_command: Some("true".into()),
                installed,
                owner_id: None,
            })
            .await;
        let runner = JobRunner::new(Arc::clone(&hub), Arc::clone(&registry));
        (hub, registry, runner, tool.id)
    }

    /// Subscribe to a job and collect everything after the ack until the
    /// stream's `end` event.
    async fn collect_events(hub: &TerminalHub, job_id: i64) -> mpsc::UnboundedReceiver<TerminalEvent> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.subscribe(Uuid::new_v4(), job_id, tx).await;
        let ack = rx.recv().await.unwrap();
        assert_eq!(ack.kind, EventKind::Subscribed);
        rx
    }

    async fn drain_until_end(rx: &mut mpsc::UnboundedReceiver<TerminalEvent>) -> Vec<TerminalEvent> {
        let mut events = Vec::new();
        loop {
            let event = tokio::time::timeout(Duration::from_secs(10), rx.recv())
                .await
                .expect("job should finish well within the timeout")
                .expect("hub channel should stay open");
            let terminal = event.is_terminal();
            events.push(event);
            if terminal {
                return events;
            }
        }
    }

    #[tokio::test]
    async fn successful_run_emits_start_output_success_end() {
        let (hub, _registry, runner, id) = setup(true).await;
        let mut rx = collect_events(&hub, id).await;

        runner.start(JobRequest::run(id, "printf hello", None));
        let events = drain_until_end(&mut rx).await;

        let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds.first(), Some(&EventKind::Start));
        assert_eq!(
            &kinds[kinds.len() - 2..],
            &[EventKind::Success, EventKind::End]
        );
        assert!(events[0].message.contains("Starting Semgrep"));

        let output: String = events
            .iter()
            .filter(|e| e.kind == EventKind::Stdout)
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(output, "hello");
    }

    #[tokio::test]
    async fn failing_run_emits_error_with_exit_code_then_end() {
        let (hub, _registry, runner, id) = setup(true).await;
        let mut rx = collect_events(&hub, id).await;

        runner.start(JobRequest::run(id, "exit 3", None));
        let events = drain_until_end(&mut rx).await;

        let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Start, EventKind::Error, EventKind::End]);
        assert!(events[1].message.contains("exit code: 3"));
    }

    #[tokio::test]
    async fn stderr_chunks_are_forwarded_as_stderr_events() {
        let (hub, _registry, runner, id) = setup(true).await;
        let mut rx = collect_events(&hub, id).await;

        runner.start(JobRequest::run(id, "printf oops 1>&2", None));
        let events = drain_until_end(&mut rx).await;

        let stderr: String = events
            .iter()
            .filter(|e| e.kind == EventKind::Stderr)
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(stderr, "oops");
        assert_eq!(events.last().unwrap().kind, EventKind::End);
    }

    #[tokio::test]
    async fn install_success_flips_the_installed_flag() {
        let (hub, registry, runner, id) = setup(false).await;
        let mut rx = collect_events(&hub, id).await;

        runner.start(JobRequest::install(id, "true"));
        let events = drain_until_end(&mut rx).await;

        assert!(events.iter().any(|e| e.kind == EventKind::Success));
        assert!(events
            .iter()
            .any(|e| e.message.contains("installed successfully")));
        assert!(registry.get(id).await.unwrap().installed);
    }

    #[tokio::test]
    async fn install_failure_leaves_the_flag_unchanged() {
        let (hub, registry, runner, id) = setup(false).await;
        let mut rx = collect_events(&hub, id).await;

        runner.start(JobRequest::install(id, "exit 1"));
        let events = drain_until_end(&mut rx).await;

        assert!(events.iter().any(|e| e.kind == EventKind::Error));
        assert!(!registry.get(id).await.unwrap().installed);
    }

    #[tokio::test]
    async fn spawn_failure_reports_error_then_end() {
        let (hub, registry, runner, id) = setup(false).await;
        let mut rx = collect_events(&hub, id).await;

        // A nonexistent working directory makes the spawn itself fail.
        runner.start(JobRequest::run(
            id,
            "true",
            Some("/nonexistent/fuzzhub/path".into()),
        ));
        let events = drain_until_end(&mut rx).await;

        let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Start, EventKind::Error, EventKind::End]);
        assert!(events[1].message.contains("Failed to start process"));
        assert!(!registry.get(id).await.unwrap().installed);
    }

    #[tokio::test]
    async fn job_for_unknown_tool_publishes_nothing() {
        let (hub, _registry, runner, _id) = setup(true).await;
        let mut rx = collect_events(&hub, 999).await;

        runner.start(JobRequest::run(999, "printf nope", None));
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(rx.try_recv().is_err(), "no events for a missing tool");
    }

    #[tokio::test]
    async fn two_subscribers_see_identical_sequences() {
        let (hub, _registry, runner, id) = setup(true).await;
        let mut a = collect_events(&hub, id).await;
        let mut b = collect_events(&hub, id).await;

        runner.start(JobRequest::run(id, "printf one; printf two", None));
        let seen_a = drain_until_end(&mut a).await;
        let seen_b = drain_until_end(&mut b).await;

        let flat = |events: &[TerminalEvent]| -> Vec<(EventKind, String)> {
            events.iter().map(|e| (e.kind, e.message.clone())).collect()
        };
        assert_eq!(flat(&seen_a), flat(&seen_b));
    }

    #[tokio::test]
    async fn working_dir_is_applied_to_the_child() {
        let (hub, _registry, runner, id) = setup(true).await;
        let mut rx = collect_events(&hub, id).await;

        runner.start(JobRequest::run(id, "pwd", Some("/tmp".into())));
        let events = drain_until_end(&mut rx).await;

        let output: String = events
            .iter()
            .filter(|e| e.kind == EventKind::Stdout)
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(output.trim(), "/tmp");
    }
}
