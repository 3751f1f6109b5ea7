//! Runs one planner process to completion, timeout or cancellation.
//!
//! The child gets its own process group so a launcher script and everything
//! it spawns can be killed together. Both pipes are drained while waiting.

use std::fmt;
use std::process::Stdio;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

use crate::extract::{PLAN_LENGTH_UNKNOWN, extract_plan_length};

/// `stderr` value recorded for a run that hit its timeout.
pub const TIMEOUT_MESSAGE: &str = "Timeout";

/// A program path plus its ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// The outcome of one planner invocation on one problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Exit status 0 and a positive plan length.
    pub success: bool,
    /// Wall-clock seconds; equal to the timeout for timed-out runs.
    pub runtime_seconds: f64,
    /// Number of plan actions, or `-1` when undetermined.
    pub plan_length: i64,
    pub stdout: String,
    pub stderr: String,
    /// Set only when the runner killed the process at the timeout.
    #[serde(default)]
    pub timed_out: bool,
}

impl RunOutcome {
    /// Outcome of a process that exited on its own.
    pub fn completed(exit_code: Option<i32>, runtime: Duration, stdout: String, stderr: String) -> Self {
        let plan_length = extract_plan_length(&stdout);
        Self {
            success: exit_code == Some(0) && plan_length > 0,
            runtime_seconds: runtime.as_secs_f64(),
            plan_length,
            stdout,
            stderr,
            timed_out: false,
        }
    }

    /// Outcome of a process killed after `timeout`.
    pub fn timed_out(timeout: Duration) -> Self {
        Self {
            success: false,
            runtime_seconds: timeout.as_secs_f64(),
            plan_length: PLAN_LENGTH_UNKNOWN,
            stdout: String::new(),
            stderr: TIMEOUT_MESSAGE.to_owned(),
            timed_out: true,
        }
    }

    /// Outcome of a process that could not be started or waited on.
    pub fn failed_to_run(runtime: Duration, message: String) -> Self {
        Self {
            success: false,
            runtime_seconds: runtime.as_secs_f64(),
            plan_length: PLAN_LENGTH_UNKNOWN,
            stdout: String::new(),
            stderr: message,
            timed_out: false,
        }
    }

    /// Whether the run was killed at its timeout.
    pub fn is_timeout(&self) -> bool {
        self.timed_out
    }
}

/// Run `invocation` and wait for it to exit, at most `timeout`.
///
/// stdout and stderr are captured while waiting. Every failure mode
/// (timeout, non-zero exit, no plan in the output, spawn error) comes back
/// as a [`RunOutcome`] with `success == false`; nothing is raised.
///
/// On timeout the child's whole process group is killed and the child is
/// reaped before returning.
pub async fn run(invocation: &Invocation, timeout: Duration) -> RunOutcome {
    // Nothing else holds this token, so the run always ends with an outcome.
    let never = CancellationToken::new();
    match run_cancellable(invocation, timeout, &never).await {
        Some(outcome) => outcome,
        None => RunOutcome::failed_to_run(Duration::ZERO, "cancelled".to_owned()),
    }
}

/// Like [`run`], but also stops when `cancel` fires.
///
/// Returns `None` if the run was cancelled. By then the process group has
/// been killed and the child reaped, the same as on timeout.
pub async fn run_cancellable(
    invocation: &Invocation,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Option<RunOutcome> {
    let start = Instant::now();

    let mut command = Command::new(&invocation.program);
    command
        .args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!(command = %invocation, error = %e, "failed to start planner");
            return Some(RunOutcome::failed_to_run(
                start.elapsed(),
                format!("failed to execute {}: {e}", invocation.program),
            ));
        }
    };
    tracing::debug!(command = %invocation, pid = ?child.id(), "planner started");

    // Drain both pipes while waiting so a chatty child cannot block on a
    // full pipe buffer.
    let mut stdout_pipe = child.stdout.take();
    let mut stderr_pipe = child.stderr.take();

    let read_stdout = async {
        let mut buf = Vec::new();
        if let Some(ref mut pipe) = stdout_pipe {
            pipe.read_to_end(&mut buf).await.ok();
        }
        String::from_utf8_lossy(&buf).into_owned()
    };

    let read_stderr = async {
        let mut buf = Vec::new();
        if let Some(ref mut pipe) = stderr_pipe {
            pipe.read_to_end(&mut buf).await.ok();
        }
        String::from_utf8_lossy(&buf).into_owned()
    };

    let waited = tokio::select! {
        waited = tokio::time::timeout(timeout, async {
            tokio::join!(child.wait(), read_stdout, read_stderr)
        }) => Some(waited),
        _ = cancel.cancelled() => None,
    };

    let Some(waited) = waited else {
        terminate(&mut child).await;
        tracing::warn!(program = %invocation.program, "planner interrupted and was killed");
        return None;
    };

    let outcome = match waited {
        Ok((Ok(status), stdout, stderr)) => {
            let outcome = RunOutcome::completed(status.code(), start.elapsed(), stdout, stderr);
            tracing::info!(
                program = %invocation.program,
                exit_code = ?status.code(),
                runtime_seconds = outcome.runtime_seconds,
                plan_length = outcome.plan_length,
                "planner finished"
            );
            outcome
        }
        Ok((Err(e), _, _)) => {
            tracing::warn!(command = %invocation, error = %e, "failed to wait on planner");
            terminate(&mut child).await;
            RunOutcome::failed_to_run(
                start.elapsed(),
                format!("failed to wait on {}: {e}", invocation.program),
            )
        }
        Err(_) => {
            terminate(&mut child).await;
            tracing::warn!(
                program = %invocation.program,
                timeout_secs = timeout.as_secs_f64(),
                "planner timed out and was killed"
            );
            RunOutcome::timed_out(timeout)
        }
    };
    Some(outcome)
}

/// Kill the child (and, on Unix, its process group) and reap it.
async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Some(pid) = child.id() {
            // SAFETY: the child was spawned with process_group(0), so its
            // pid is also its process group id.
            let ret = unsafe { libc::killpg(pid as libc::pid_t, libc::SIGKILL) };
            if ret != 0 {
                tracing::debug!(pid, "killpg failed, falling back to killing the child only");
            }
        }
    }

    // kill() also waits for the child, so it is reaped either way.
    if let Err(e) = child.kill().await {
        tracing::debug!(error = %e, "kill reported an error");
    }
}
