//! Planner adapters for the PDDL4J planners under benchmark.
//!
//! Each adapter implements the [`Planner`] trait: it knows how to build the
//! command line for its planner family and hands it to
//! [`crate::runner`]. Results are returned as-is.
//!
//! ```text
//! BenchmarkHarness (cancel token)
//!     |
//!     +-- hsp.run_cancellable(..)  --> invocation() --> runner::run_cancellable --> Option<RunOutcome>
//!     +-- mcts.run_cancellable(..) --> invocation() --> runner::run_cancellable --> Option<RunOutcome>
//! ```

pub mod distribution;
pub mod hsp;
pub mod mcts;
pub mod trait_def;

pub use distribution::Pddl4jDistribution;
pub use hsp::{HspPlanner, run_hsp};
pub use mcts::{MctsPlanner, run_mcts};
pub use trait_def::Planner;
