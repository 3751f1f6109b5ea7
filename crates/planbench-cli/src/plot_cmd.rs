//! `planbench plot` command: render comparison figures from saved results.

use std::path::Path;

use anyhow::{Context, Result};

use planbench_core::{ResultSet, chart, summarize};

/// Load `input` and render one figure per domain into `figures_dir`.
pub fn run_plot(input: &Path, figures_dir: &Path) -> Result<()> {
    let results = ResultSet::load(input)
        .with_context(|| format!("failed to load results from {}", input.display()))?;
    render(&results, figures_dir)
}

/// Render figures for `results`; prints a notice and writes nothing when
/// there are no results.
pub fn render(results: &ResultSet, figures_dir: &Path) -> Result<()> {
    if results.is_empty() {
        println!("No results to plot");
        return Ok(());
    }

    let written = chart::render_figures(&summarize(results), figures_dir)?;
    for path in &written {
        println!("Figure written to {}", path.display());
    }
    Ok(())
}
