//! End-to-end tests for the benchmark sweep.
//!
//! The PDDL4J planners are replaced by shell scripts installed as the
//! `java` launcher, so these tests exercise the real runner, adapters,
//! result set, summary and chart rendering without a JVM.

#![cfg(unix)]

use std::time::{Duration, Instant};

use planbench_core::chart;
use planbench_core::planner::{HspPlanner, MctsPlanner, Pddl4jDistribution, Planner};
use planbench_core::suite;
use planbench_core::{BenchmarkHarness, ResultSet, summarize};
use planbench_test_utils::{FakePlanner, PddlSuite, recorded_args, recorded_child_pid, recorded_pid};

fn distribution(java: &std::path::Path) -> Pddl4jDistribution {
    Pddl4jDistribution::new("pddl4j.jar").java(java.display().to_string())
}

#[tokio::test]
async fn sweep_records_every_problem_and_round_trips() {
    let suite = PddlSuite::new()
        .domain("blocksworld", &["p01", "p02"])
        .domain("gripper", &["p01"]);
    let hsp_java = FakePlanner::printing("found plan as follows:\nPlan length: 6").install(suite.scratch(), "hsp-java");
    let mcts_java = FakePlanner::printing("(pick-up a)\n(stack a b)\n(pick-up c)")
        .install(suite.scratch(), "mcts-java");

    let timeout = Duration::from_secs(30);
    let harness = BenchmarkHarness::new(
        HspPlanner::new(distribution(&hsp_java), timeout),
        MctsPlanner::new(distribution(&mcts_java), timeout),
    );

    let problems = suite::discover(&suite.root()).unwrap();
    assert_eq!(problems.len(), 3);

    let mut results = ResultSet::new();
    let stats = harness.run_suite(&problems, &mut results).await;

    assert_eq!(stats.problems, 3);
    assert_eq!(stats.hsp_solved, 3);
    assert_eq!(stats.mcts_solved, 3);
    assert_eq!(results.len(), 3);
    for record in results.records() {
        assert_eq!(record.hsp_outcome.plan_length, 6);
        assert_eq!(record.mcts_outcome.plan_length, 3, "fallback counts action lines");
    }

    let path = suite.scratch().join("benchmark_results.json");
    results.save(&path).unwrap();
    assert_eq!(ResultSet::load(&path).unwrap(), results);

    let figures = chart::render_figures(&summarize(&results), &suite.scratch().join("results/figures")).unwrap();
    let names: Vec<String> = figures
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["blocksworld_comparison.svg", "gripper_comparison.svg"]);
}

#[tokio::test]
async fn adapters_pass_pddl4j_arguments() {
    let suite = PddlSuite::new().domain("depot", &["p01"]);
    let hsp_java = FakePlanner::printing("Steps: 2").install(suite.scratch(), "hsp-java");
    let mcts_java = FakePlanner::printing("Steps: 2").install(suite.scratch(), "mcts-java");

    let problem = &suite::discover(&suite.root()).unwrap()[0];
    let timeout = Duration::from_secs(42);

    HspPlanner::new(distribution(&hsp_java), timeout)
        .run(&problem.domain_file, &problem.problem_file)
        .await;
    MctsPlanner::new(distribution(&mcts_java), timeout)
        .walks(std::num::NonZeroU32::new(10).unwrap())
        .run(&problem.domain_file, &problem.problem_file)
        .await;

    let domain = problem.domain_file.display().to_string();
    let prob = problem.problem_file.display().to_string();

    assert_eq!(
        recorded_args(suite.scratch(), "hsp-java"),
        vec![
            "-cp".to_owned(),
            "pddl4j.jar".to_owned(),
            "fr.uga.pddl4j.planners.statespace.HSP".to_owned(),
            "-d".to_owned(),
            domain.clone(),
            "-p".to_owned(),
            prob.clone(),
            "-t".to_owned(),
            "42".to_owned(),
        ]
    );
    assert_eq!(
        recorded_args(suite.scratch(), "mcts-java"),
        vec![
            "-cp".to_owned(),
            "pddl4j.jar:target/classes".to_owned(),
            "fr.uga.pddl4j.planners.mcts.MCTSPlanner".to_owned(),
            "-d".to_owned(),
            domain,
            "-p".to_owned(),
            prob,
            "-t".to_owned(),
            "42".to_owned(),
            "-w".to_owned(),
            "10".to_owned(),
            "-l".to_owned(),
            "100".to_owned(),
        ]
    );
}

#[tokio::test]
async fn hanging_planner_is_killed_and_recorded_as_timeout() {
    let suite = PddlSuite::new().domain("logistics", &["p01"]);
    let hsp_java = FakePlanner::printing("Plan length: 4").install(suite.scratch(), "hsp-java");
    let mcts_java = FakePlanner::hanging().install(suite.scratch(), "mcts-java");

    let harness = BenchmarkHarness::new(
        HspPlanner::new(distribution(&hsp_java), Duration::from_secs(30)),
        MctsPlanner::new(distribution(&mcts_java), Duration::from_secs(1)),
    );
    let problems = suite::discover(&suite.root()).unwrap();
    let mut results = ResultSet::new();

    let started = Instant::now();
    harness.run_suite(&problems, &mut results).await;
    let elapsed = started.elapsed();

    let mcts = &results.records()[0].mcts_outcome;
    assert!(!mcts.success);
    assert_eq!(mcts.runtime_seconds, 1.0);
    assert_eq!(mcts.plan_length, -1);
    assert_eq!(mcts.stderr, "Timeout");
    assert!(mcts.stdout.is_empty());
    assert!(elapsed < Duration::from_secs(15), "sweep took {elapsed:?}");

    let pid = recorded_pid(suite.scratch(), "mcts-java").expect("script should record its pid");
    let child = recorded_child_pid(suite.scratch(), "mcts-java").expect("script should record its child");
    #[cfg(target_os = "linux")]
    {
        assert!(
            !planbench_test_utils::process_alive(pid),
            "timed-out planner {pid} is still running"
        );
        assert!(
            !planbench_test_utils::process_alive(child),
            "child {child} of the timed-out planner is still running"
        );
    }
    let _ = (pid, child);
}

#[tokio::test]
async fn failing_planner_is_recorded_not_raised() {
    let suite = PddlSuite::new().domain("rovers", &["p01"]);
    let hsp_java = FakePlanner::printing("Plan length: 5")
        .stderr("java.lang.OutOfMemoryError")
        .exit_code(1)
        .install(suite.scratch(), "hsp-java");
    let mcts_java = FakePlanner::printing("search exhausted, no plan").install(suite.scratch(), "mcts-java");

    let harness = BenchmarkHarness::new(
        HspPlanner::new(distribution(&hsp_java), Duration::from_secs(30)),
        MctsPlanner::new(distribution(&mcts_java), Duration::from_secs(30)),
    );
    let problems = suite::discover(&suite.root()).unwrap();
    let mut results = ResultSet::new();
    let stats = harness.run_suite(&problems, &mut results).await;

    let record = &results.records()[0];
    assert!(!record.hsp_outcome.success);
    assert_eq!(record.hsp_outcome.plan_length, 5);
    assert!(record.hsp_outcome.stderr.contains("OutOfMemoryError"));
    assert!(!record.mcts_outcome.success);
    assert_eq!(record.mcts_outcome.plan_length, -1);
    assert_eq!(stats.hsp_solved + stats.mcts_solved, 0);
    assert_eq!(stats.timeouts, 0);
}

#[tokio::test]
async fn missing_java_launcher_is_recorded_not_raised() {
    let suite = PddlSuite::new().domain("satellite", &["p01"]);
    let missing = suite.scratch().join("no-such-java");

    let harness = BenchmarkHarness::new(
        HspPlanner::new(distribution(&missing), Duration::from_secs(5)),
        MctsPlanner::new(distribution(&missing), Duration::from_secs(5)),
    );
    let problems = suite::discover(&suite.root()).unwrap();
    let mut results = ResultSet::new();
    harness.run_suite(&problems, &mut results).await;

    let record = &results.records()[0];
    assert!(!record.hsp_outcome.success);
    assert!(record.hsp_outcome.stderr.contains("failed to execute"));
    assert!(!record.mcts_outcome.success);
}
