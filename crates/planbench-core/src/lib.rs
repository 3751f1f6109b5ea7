//! Benchmark harness for comparing the PDDL4J HSP and MCTS planners.
//!
//! Pipeline: [`suite::discover`] finds domain/problem pairs,
//! [`harness::BenchmarkHarness`] runs each [`planner::Planner`] through
//! [`runner::run`], [`extract`] pulls the plan length out of stdout, and
//! the outcomes accumulate in a [`results::ResultSet`] that can be saved,
//! [`summary::summarize`]d and rendered by [`chart`].

pub mod chart;
pub mod extract;
pub mod harness;
pub mod planner;
pub mod results;
pub mod runner;
pub mod suite;
pub mod summary;

pub use extract::{PLAN_LENGTH_UNKNOWN, PlanLengthExtractor, extract_plan_length};
pub use harness::{BenchmarkHarness, SweepStats};
pub use results::{ComparisonRecord, ResultSet, ResultsError};
pub use runner::{Invocation, RunOutcome};
pub use suite::BenchmarkProblem;
pub use summary::{DomainSummary, SummaryPoint, summarize};
