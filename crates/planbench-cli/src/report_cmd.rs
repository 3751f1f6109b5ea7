//! `planbench report` command: tabulate a saved results file.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};

use planbench_core::{ResultSet, RunOutcome};

/// Run the report command.
pub fn run_report(input: &Path) -> Result<()> {
    let results = ResultSet::load(input)
        .with_context(|| format!("failed to load results from {}", input.display()))?;

    if results.is_empty() {
        println!("No results in {}", input.display());
        return Ok(());
    }

    print!("{}", render_report(&results));
    Ok(())
}

/// Render the per-problem table followed by per-planner success rates.
pub fn render_report(results: &ResultSet) -> String {
    ReportTable(results).to_string()
}

struct ReportTable<'a>(&'a ResultSet);

impl fmt::Display for ReportTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let results = self.0;

        writeln!(
            f,
            "{:<20} {:<20} {:>10} {:>8} {:>10} {:>8}",
            "DOMAIN", "PROBLEM", "HSP TIME", "HSP LEN", "MCTS TIME", "MCTS LEN"
        )?;
        writeln!(f, "{}", "-".repeat(81))?;

        for record in results.records() {
            writeln!(
                f,
                "{:<20} {:<20} {:>10} {:>8} {:>10} {:>8}",
                truncate(&record.domain, 20),
                truncate(&record.problem, 20),
                time_cell(&record.hsp_outcome),
                length_cell(&record.hsp_outcome),
                time_cell(&record.mcts_outcome),
                length_cell(&record.mcts_outcome),
            )?;
        }

        let total = results.len();
        let hsp = results.records().iter().filter(|r| r.hsp_outcome.success).count();
        let mcts = results.records().iter().filter(|r| r.mcts_outcome.success).count();

        writeln!(f)?;
        writeln!(f, "HSP success rate:  {hsp}/{total} ({:.0}%)", percent(hsp, total))?;
        writeln!(f, "MCTS success rate: {mcts}/{total} ({:.0}%)", percent(mcts, total))
    }
}

fn time_cell(outcome: &RunOutcome) -> String {
    if outcome.is_timeout() {
        "timeout".to_owned()
    } else {
        format!("{:.2}s", outcome.runtime_seconds)
    }
}

fn length_cell(outcome: &RunOutcome) -> String {
    if outcome.plan_length > 0 {
        outcome.plan_length.to_string()
    } else {
        "-".to_owned()
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let head: String = s.chars().take(width - 3).collect();
        format!("{head}...")
    } else {
        s.to_owned()
    }
}
