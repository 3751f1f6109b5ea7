//! Benchmark result set: one [`ComparisonRecord`] per benchmarked problem,
//! in the order the problems were run.
//!
//! The set is persisted as a pretty-printed JSON array so result files stay
//! diffable between runs.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runner::RunOutcome;

/// Default file name for persisted results.
pub const DEFAULT_RESULTS_FILE: &str = "benchmark_results.json";

/// Errors from persisting or reloading a result set.
#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid results JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Both planners' outcomes on one domain/problem pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub domain: String,
    pub problem: String,
    pub hsp_outcome: RunOutcome,
    pub mcts_outcome: RunOutcome,
}

/// Ordered, append-only collection of comparison records.
///
/// Duplicate domain/problem pairs are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: Vec<ComparisonRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the outcomes of both planners for one problem.
    pub fn record(
        &mut self,
        domain: impl Into<String>,
        problem: impl Into<String>,
        hsp_outcome: RunOutcome,
        mcts_outcome: RunOutcome,
    ) {
        self.records.push(ComparisonRecord {
            domain: domain.into(),
            problem: problem.into(),
            hsp_outcome,
            mcts_outcome,
        });
    }

    pub fn records(&self) -> &[ComparisonRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the set as pretty-printed JSON.
    pub fn export(&self) -> Result<String, ResultsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a set previously produced by [`ResultSet::export`].
    pub fn from_json(json: &str) -> Result<Self, ResultsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the set to `path`, replacing any existing file. The parent
    /// directory is created if needed.
    pub fn save(&self, path: &Path) -> Result<(), ResultsError> {
        let json = self.export()?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;
        }
        std::fs::write(path, json).map_err(|source| io_error(path, source))?;
        tracing::info!(path = %path.display(), records = self.len(), "results saved");
        Ok(())
    }

    /// Load a set from a file written by [`ResultSet::save`].
    pub fn load(path: &Path) -> Result<Self, ResultsError> {
        let json = std::fs::read_to_string(path).map_err(|source| io_error(path, source))?;
        Self::from_json(&json)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ResultsError {
    ResultsError::Io {
        path: path.display().to_string(),
        source,
    }
}
