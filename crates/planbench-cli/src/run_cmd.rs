//! `planbench run` command: benchmark every problem with both planners.

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use planbench_core::planner::{HspPlanner, MctsPlanner};
use planbench_core::{BenchmarkHarness, ResultSet, suite};

use crate::config::BenchConfig;
use crate::plot_cmd;

/// Run the benchmark sweep, save the results and render the figures.
///
/// Planner failures end up in the results file. Only set-up problems
/// (unreadable domains directory), output I/O errors and cancellation fail
/// the command. A cancelled sweep still writes what it recorded so far.
pub async fn run_benchmark(pddl4j_path: &str, cfg: &BenchConfig, cancel: CancellationToken) -> Result<()> {
    let problems = suite::discover(&cfg.domains_path)?;
    if problems.is_empty() {
        tracing::warn!(path = %cfg.domains_path.display(), "no problems found");
    }
    println!(
        "Benchmarking {} problems from {} (timeout {}s per run)",
        problems.len(),
        cfg.domains_path.display(),
        cfg.timeout.as_secs()
    );

    let distribution = cfg.distribution(pddl4j_path);
    let harness = BenchmarkHarness::new(
        HspPlanner::new(distribution.clone(), cfg.timeout),
        MctsPlanner::new(distribution, cfg.timeout)
            .walks(cfg.walks)
            .walk_length(cfg.walk_length),
    )
    .with_cancellation(cancel);

    let mut results = ResultSet::new();
    let stats = harness.run_suite(&problems, &mut results).await;

    println!();
    println!("Problems: {}", stats.problems);
    println!("  HSP solved:  {}/{}", stats.hsp_solved, stats.problems);
    println!("  MCTS solved: {}/{}", stats.mcts_solved, stats.problems);
    println!("  Timeouts:    {}", stats.timeouts);
    if stats.interrupted {
        println!("  Interrupted before all {} problems ran", problems.len());
    }
    println!();

    // Try both outputs even if the first one fails.
    let saved = results.save(&cfg.results_file);
    match &saved {
        Ok(()) => println!("Results saved to {}", cfg.results_file.display()),
        Err(e) => tracing::error!(error = %e, "failed to save results"),
    }

    let plotted = plot_cmd::render(&results, &cfg.figures_dir);
    if let Err(e) = &plotted {
        tracing::error!(error = %format!("{e:#}"), "failed to render figures");
    }

    match (saved, plotted) {
        (Ok(()), Ok(())) if stats.interrupted => anyhow::bail!("benchmark interrupted"),
        (Ok(()), Ok(())) => {
            println!("Benchmark completed!");
            Ok(())
        }
        (Err(e), _) => Err(anyhow::Error::new(e).context("failed to save results")),
        (Ok(()), Err(e)) => Err(e),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::num::NonZeroU32;
    use std::time::Duration;

    use planbench_test_utils::{FakePlanner, PddlSuite};

    use super::*;

    fn config(suite: &PddlSuite, java: &std::path::Path) -> BenchConfig {
        BenchConfig {
            java: java.display().to_string(),
            mcts_extra_classpath: "target/classes".to_owned(),
            walks: NonZeroU32::new(10).unwrap(),
            walk_length: NonZeroU32::new(5).unwrap(),
            timeout: Duration::from_secs(30),
            domains_path: suite.root(),
            results_file: suite.scratch().join("benchmark_results.json"),
            figures_dir: suite.scratch().join("results").join("figures"),
        }
    }

    #[tokio::test]
    async fn writes_results_and_figures() {
        let suite = PddlSuite::new().domain("blocksworld", &["p01", "p02"]);
        let java = FakePlanner::printing("Plan length: 4").install(suite.scratch(), "java");
        let cfg = config(&suite, &java);

        run_benchmark("pddl4j.jar", &cfg, CancellationToken::new()).await.unwrap();

        let results = ResultSet::load(&cfg.results_file).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.records().iter().all(|r| r.hsp_outcome.success && r.mcts_outcome.success));
        assert!(cfg.figures_dir.join("blocksworld_comparison.svg").exists());
    }

    #[tokio::test]
    async fn planner_failures_do_not_fail_the_command() {
        let suite = PddlSuite::new().domain("gripper", &["p01"]);
        let java = FakePlanner::printing("Exception in thread main")
            .exit_code(1)
            .install(suite.scratch(), "java");
        let cfg = config(&suite, &java);

        run_benchmark("pddl4j.jar", &cfg, CancellationToken::new()).await.unwrap();

        let results = ResultSet::load(&cfg.results_file).unwrap();
        assert!(!results.records()[0].hsp_outcome.success);
    }

    #[tokio::test]
    async fn interrupted_sweep_saves_partial_results_and_fails() {
        let suite = PddlSuite::new().domain("logistics", &["p01", "p02"]);
        let java = FakePlanner::hanging().install(suite.scratch(), "java");
        let cfg = config(&suite, &java);

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            trigger.cancel();
        });

        let err = run_benchmark("pddl4j.jar", &cfg, cancel).await.unwrap_err();

        assert!(err.to_string().contains("interrupted"), "unexpected error: {err:#}");
        let results = ResultSet::load(&cfg.results_file).unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn missing_domains_directory_fails() {
        let suite = PddlSuite::new();
        let java = FakePlanner::printing("").install(suite.scratch(), "java");
        let mut cfg = config(&suite, &java);
        cfg.domains_path = suite.scratch().join("does-not-exist");

        assert!(run_benchmark("pddl4j.jar", &cfg, CancellationToken::new()).await.is_err());
    }
}
