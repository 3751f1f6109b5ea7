//! Per-domain comparison data for charts and reports.
//!
//! [`summarize`] groups records by domain and orders each domain's problems
//! by ascending HSP runtime, which serves as a difficulty axis. Plan lengths
//! that are not positive become `f64::INFINITY` so an unsolved problem never
//! reads as a short plan.

use crate::results::{ComparisonRecord, ResultSet};

/// One problem's position on a domain chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPoint {
    pub problem: String,
    pub hsp_runtime: f64,
    pub mcts_runtime: f64,
    /// Display length; `f64::INFINITY` when HSP found no plan.
    pub hsp_length: f64,
    /// Display length; `f64::INFINITY` when MCTS found no plan.
    pub mcts_length: f64,
}

impl SummaryPoint {
    fn from_record(record: &ComparisonRecord) -> Self {
        Self {
            problem: record.problem.clone(),
            hsp_runtime: record.hsp_outcome.runtime_seconds,
            mcts_runtime: record.mcts_outcome.runtime_seconds,
            hsp_length: display_length(record.hsp_outcome.plan_length),
            mcts_length: display_length(record.mcts_outcome.plan_length),
        }
    }
}

/// All points for one domain, ordered along the x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainSummary {
    pub domain: String,
    pub points: Vec<SummaryPoint>,
}

impl DomainSummary {
    /// Points whose HSP and MCTS lengths are both finite.
    pub fn both_solved(&self) -> usize {
        self.points
            .iter()
            .filter(|p| p.hsp_length.is_finite() && p.mcts_length.is_finite())
            .count()
    }
}

/// Map a plan length to its chart value.
pub fn display_length(plan_length: i64) -> f64 {
    if plan_length > 0 {
        plan_length as f64
    } else {
        f64::INFINITY
    }
}

/// Group records by domain, in order of each domain's first appearance,
/// and sort every group by ascending HSP runtime (stable).
///
/// An empty set yields an empty vector.
pub fn summarize(results: &ResultSet) -> Vec<DomainSummary> {
    if results.is_empty() {
        tracing::info!("no results to summarize");
        return Vec::new();
    }

    let mut summaries: Vec<DomainSummary> = Vec::new();
    for record in results.records() {
        let point = SummaryPoint::from_record(record);
        match summaries.iter_mut().find(|s| s.domain == record.domain) {
            Some(summary) => summary.points.push(point),
            None => summaries.push(DomainSummary {
                domain: record.domain.clone(),
                points: vec![point],
            }),
        }
    }

    for summary in &mut summaries {
        summary
            .points
            .sort_by(|a, b| a.hsp_runtime.total_cmp(&b.hsp_runtime));
    }

    summaries
}
