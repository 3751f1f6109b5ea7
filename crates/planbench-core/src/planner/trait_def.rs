//! The `Planner` trait -- the adapter interface for external planners.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::runner::{self, Invocation, RunOutcome};

/// Adapter interface for an external planning program.
///
/// Implementors only describe how to invoke their planner; running,
/// timing and output parsing are shared through the provided
/// [`Planner::run`]. The trait is object safe so the harness can hold
/// `Box<dyn Planner>`.
#[async_trait]
pub trait Planner: Send + Sync {
    /// Short name used in logs and reports (e.g. "hsp").
    fn name(&self) -> &str;

    /// Upper bound on how long a single run may take.
    fn timeout(&self) -> Duration;

    /// Build the command line that solves `problem_file` in `domain_file`.
    fn invocation(&self, domain_file: &Path, problem_file: &Path) -> Invocation;

    /// Run the planner on one problem and wait for the outcome.
    async fn run(&self, domain_file: &Path, problem_file: &Path) -> RunOutcome {
        let invocation = self.invocation(domain_file, problem_file);
        tracing::debug!(planner = self.name(), command = %invocation, "running planner");
        runner::run(&invocation, self.timeout()).await
    }

    /// Like [`Planner::run`], but gives up (killing the planner) when
    /// `cancel` fires. Returns `None` in that case.
    async fn run_cancellable(
        &self,
        domain_file: &Path,
        problem_file: &Path,
        cancel: &CancellationToken,
    ) -> Option<RunOutcome> {
        let invocation = self.invocation(domain_file, problem_file);
        tracing::debug!(planner = self.name(), command = %invocation, "running planner");
        runner::run_cancellable(&invocation, self.timeout(), cancel).await
    }
}

const _: () = {
    fn _assert_object_safe(_: &dyn Planner) {}
};
