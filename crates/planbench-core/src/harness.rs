//! Sequential benchmark sweep.
//!
//! For each problem the harness runs HSP, then MCTS, then appends one
//! [`ComparisonRecord`](crate::results::ComparisonRecord) to the caller's
//! [`ResultSet`]. Runs never overlap. A failed or timed-out run is recorded
//! as such and the sweep moves on; nothing is retried.
//!
//! Cancelling the harness token kills the planner that is running, drops
//! the unfinished problem and stops the sweep.

use tokio_util::sync::CancellationToken;

use crate::planner::Planner;
use crate::results::ResultSet;
use crate::suite::BenchmarkProblem;

/// Counters for a finished sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub problems: usize,
    pub hsp_solved: usize,
    pub mcts_solved: usize,
    /// Runs (of either planner) that hit the timeout.
    pub timeouts: usize,
    /// The sweep was cancelled before every problem was recorded.
    pub interrupted: bool,
}

impl SweepStats {
    fn interrupted() -> Self {
        Self {
            interrupted: true,
            ..Self::default()
        }
    }
}

/// Drives both planners over a list of problems.
pub struct BenchmarkHarness {
    hsp: Box<dyn Planner>,
    mcts: Box<dyn Planner>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for BenchmarkHarness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkHarness")
            .field("hsp", &self.hsp.name())
            .field("mcts", &self.mcts.name())
            .finish()
    }
}

impl BenchmarkHarness {
    pub fn new(hsp: impl Planner + 'static, mcts: impl Planner + 'static) -> Self {
        Self {
            hsp: Box::new(hsp),
            mcts: Box::new(mcts),
            cancel: CancellationToken::new(),
        }
    }

    /// Stop the sweep when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Benchmark one problem with both planners and record the pair.
    ///
    /// Nothing is recorded if the harness is cancelled part way through;
    /// the returned stats then only carry `interrupted`.
    pub async fn run_problem(&self, problem: &BenchmarkProblem, results: &mut ResultSet) -> SweepStats {
        tracing::info!(domain = %problem.domain, problem = %problem.problem, "benchmarking");

        let (domain_file, problem_file) = (&problem.domain_file, &problem.problem_file);
        let Some(hsp_outcome) = self.hsp.run_cancellable(domain_file, problem_file, &self.cancel).await else {
            return SweepStats::interrupted();
        };
        let Some(mcts_outcome) = self.mcts.run_cancellable(domain_file, problem_file, &self.cancel).await else {
            return SweepStats::interrupted();
        };

        let stats = SweepStats {
            problems: 1,
            hsp_solved: usize::from(hsp_outcome.success),
            mcts_solved: usize::from(mcts_outcome.success),
            timeouts: usize::from(hsp_outcome.is_timeout()) + usize::from(mcts_outcome.is_timeout()),
            interrupted: false,
        };

        tracing::info!(
            domain = %problem.domain,
            problem = %problem.problem,
            hsp_success = hsp_outcome.success,
            hsp_runtime = hsp_outcome.runtime_seconds,
            hsp_plan_length = hsp_outcome.plan_length,
            mcts_success = mcts_outcome.success,
            mcts_runtime = mcts_outcome.runtime_seconds,
            mcts_plan_length = mcts_outcome.plan_length,
            "problem done"
        );

        results.record(
            problem.domain.clone(),
            problem.problem.clone(),
            hsp_outcome,
            mcts_outcome,
        );
        stats
    }

    /// Benchmark every problem in order, stopping early if cancelled.
    pub async fn run_suite(&self, problems: &[BenchmarkProblem], results: &mut ResultSet) -> SweepStats {
        let mut total = SweepStats::default();
        for (i, problem) in problems.iter().enumerate() {
            if self.cancel.is_cancelled() {
                total.interrupted = true;
            }
            if total.interrupted {
                tracing::info!(completed = total.problems, total = problems.len(), "sweep interrupted");
                break;
            }
            tracing::debug!(index = i + 1, total = problems.len(), "next problem");
            total += self.run_problem(problem, results).await;
        }
        total
    }
}

impl std::ops::AddAssign for SweepStats {
    fn add_assign(&mut self, other: Self) {
        self.problems += other.problems;
        self.hsp_solved += other.hsp_solved;
        self.mcts_solved += other.mcts_solved;
        self.timeouts += other.timeouts;
        self.interrupted |= other.interrupted;
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::runner::Invocation;

    /// Prints a canned report through `sh`.
    struct ScriptPlanner {
        name: &'static str,
        script: &'static str,
    }

    #[async_trait]
    impl Planner for ScriptPlanner {
        fn name(&self) -> &str {
            self.name
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(1)
        }

        fn invocation(&self, _domain_file: &Path, _problem_file: &Path) -> Invocation {
            Invocation::new("sh").arg("-c").arg(self.script)
        }
    }

    fn problem(domain: &str, name: &str) -> BenchmarkProblem {
        BenchmarkProblem {
            domain: domain.to_owned(),
            problem: name.to_owned(),
            domain_file: PathBuf::from(format!("{domain}/domain.pddl")),
            problem_file: PathBuf::from(format!("{domain}/{name}.pddl")),
        }
    }

    #[tokio::test]
    async fn records_both_outcomes_per_problem() {
        let harness = BenchmarkHarness::new(
            ScriptPlanner { name: "hsp", script: "echo 'Plan length: 6'" },
            ScriptPlanner { name: "mcts", script: "echo 'Solution found with 9 actions'" },
        );
        let mut results = ResultSet::new();

        let stats = harness
            .run_suite(&[problem("blocksworld", "p01"), problem("gripper", "p01")], &mut results)
            .await;

        assert_eq!(results.len(), 2);
        let first = &results.records()[0];
        assert_eq!(first.domain, "blocksworld");
        assert_eq!(first.hsp_outcome.plan_length, 6);
        assert_eq!(first.mcts_outcome.plan_length, 9);
        assert_eq!(
            stats,
            SweepStats { problems: 2, hsp_solved: 2, mcts_solved: 2, timeouts: 0, interrupted: false }
        );
    }

    #[tokio::test]
    async fn timeout_does_not_abort_the_sweep() {
        let harness = BenchmarkHarness::new(
            ScriptPlanner { name: "hsp", script: "echo 'Steps: 3'" },
            ScriptPlanner { name: "mcts", script: "sleep 30" },
        );
        let mut results = ResultSet::new();

        let stats = harness
            .run_suite(&[problem("depot", "p01"), problem("depot", "p02")], &mut results)
            .await;

        assert_eq!(results.len(), 2);
        for record in results.records() {
            assert!(record.hsp_outcome.success);
            assert!(record.mcts_outcome.is_timeout());
            assert_eq!(record.mcts_outcome.runtime_seconds, 1.0);
        }
        assert_eq!(stats.timeouts, 2);
        assert_eq!(stats.mcts_solved, 0);
    }

    #[tokio::test]
    async fn cancelled_harness_records_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let harness = BenchmarkHarness::new(
            ScriptPlanner { name: "hsp", script: "echo 'Steps: 3'" },
            ScriptPlanner { name: "mcts", script: "echo 'Steps: 3'" },
        )
        .with_cancellation(cancel);
        let mut results = ResultSet::new();

        let stats = harness.run_suite(&[problem("depot", "p01")], &mut results).await;

        assert!(stats.interrupted);
        assert_eq!(stats.problems, 0);
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn cancelling_mid_run_drops_the_unfinished_problem() {
        let cancel = CancellationToken::new();
        let harness = BenchmarkHarness::new(
            ScriptPlanner { name: "hsp", script: "echo 'Steps: 3'" },
            ScriptPlanner { name: "mcts", script: "sleep 30" },
        )
        .with_cancellation(cancel.clone());
        let mut results = ResultSet::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });
        let stats = harness
            .run_suite(&[problem("depot", "p01"), problem("depot", "p02")], &mut results)
            .await;

        assert!(stats.interrupted);
        assert!(results.len() < 2, "sweep should stop after cancellation");
    }

    #[test]
    fn debug_shows_planner_names() {
        let harness = BenchmarkHarness::new(
            ScriptPlanner { name: "hsp", script: "true" },
            ScriptPlanner { name: "mcts", script: "true" },
        );
        let debug = format!("{harness:?}");
        assert!(debug.contains("hsp") && debug.contains("mcts"));
    }
}
