//! Adapter for the Monte-Carlo-Tree-Search planner.

use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use super::distribution::Pddl4jDistribution;
use super::trait_def::Planner;
use crate::runner::{Invocation, RunOutcome};

/// Fully qualified entry point of the MCTS planner.
pub const MCTS_MAIN_CLASS: &str = "fr.uga.pddl4j.planners.mcts.MCTSPlanner";

/// Default number of random walks per search step.
pub const DEFAULT_WALKS: NonZeroU32 = NonZeroU32::new(1000).unwrap();

/// Default maximum length of a random walk.
pub const DEFAULT_WALK_LENGTH: NonZeroU32 = NonZeroU32::new(100).unwrap();

/// Runs `fr.uga.pddl4j.planners.mcts.MCTSPlanner` through the JVM.
#[derive(Debug, Clone)]
pub struct MctsPlanner {
    distribution: Pddl4jDistribution,
    timeout: Duration,
    walks: NonZeroU32,
    walk_length: NonZeroU32,
}

impl MctsPlanner {
    /// Planner with the default walk count and walk length.
    pub fn new(distribution: Pddl4jDistribution, timeout: Duration) -> Self {
        Self {
            distribution,
            timeout,
            walks: DEFAULT_WALKS,
            walk_length: DEFAULT_WALK_LENGTH,
        }
    }

    /// Set the number of random walks.
    pub fn walks(mut self, walks: NonZeroU32) -> Self {
        self.walks = walks;
        self
    }

    /// Set the maximum walk length.
    pub fn walk_length(mut self, walk_length: NonZeroU32) -> Self {
        self.walk_length = walk_length;
        self
    }
}

#[async_trait]
impl Planner for MctsPlanner {
    fn name(&self) -> &str {
        "mcts"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn invocation(&self, domain_file: &Path, problem_file: &Path) -> Invocation {
        Invocation::new(&self.distribution.java)
            .arg("-cp")
            .arg(self.distribution.mcts_classpath())
            .arg(MCTS_MAIN_CLASS)
            .arg("-d")
            .arg(domain_file.display().to_string())
            .arg("-p")
            .arg(problem_file.display().to_string())
            .arg("-t")
            .arg(self.timeout.as_secs().to_string())
            .arg("-w")
            .arg(self.walks.to_string())
            .arg("-l")
            .arg(self.walk_length.to_string())
    }
}

/// Run MCTS once on `problem_file`.
pub async fn run_mcts(
    distribution: &Pddl4jDistribution,
    domain_file: &Path,
    problem_file: &Path,
    timeout: Duration,
    walks: NonZeroU32,
    walk_length: NonZeroU32,
) -> RunOutcome {
    MctsPlanner::new(distribution.clone(), timeout)
        .walks(walks)
        .walk_length(walk_length)
        .run(domain_file, problem_file)
        .await
}
