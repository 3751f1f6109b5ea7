//! Adapter for the PDDL4J heuristic state-space planner (HSP).

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use super::distribution::Pddl4jDistribution;
use super::trait_def::Planner;
use crate::runner::{Invocation, RunOutcome};

/// Fully qualified entry point of the HSP planner.
pub const HSP_MAIN_CLASS: &str = "fr.uga.pddl4j.planners.statespace.HSP";

/// Runs `fr.uga.pddl4j.planners.statespace.HSP` through the JVM.
#[derive(Debug, Clone)]
pub struct HspPlanner {
    distribution: Pddl4jDistribution,
    timeout: Duration,
}

impl HspPlanner {
    pub fn new(distribution: Pddl4jDistribution, timeout: Duration) -> Self {
        Self {
            distribution,
            timeout,
        }
    }
}

#[async_trait]
impl Planner for HspPlanner {
    fn name(&self) -> &str {
        "hsp"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn invocation(&self, domain_file: &Path, problem_file: &Path) -> Invocation {
        Invocation::new(&self.distribution.java)
            .arg("-cp")
            .arg(&self.distribution.classpath)
            .arg(HSP_MAIN_CLASS)
            .arg("-d")
            .arg(domain_file.display().to_string())
            .arg("-p")
            .arg(problem_file.display().to_string())
            .arg("-t")
            .arg(self.timeout.as_secs().to_string())
    }
}

/// Run HSP once on `problem_file`.
pub async fn run_hsp(
    distribution: &Pddl4jDistribution,
    domain_file: &Path,
    problem_file: &Path,
    timeout: Duration,
) -> RunOutcome {
    HspPlanner::new(distribution.clone(), timeout)
        .run(domain_file, problem_file)
        .await
}
