//! SVG rendering of per-domain comparison charts.
//!
//! Each figure has two side-by-side panels, runtime on the left and plan
//! length on the right, with HSP in blue (circles) and MCTS in red
//! (squares). Infinite plan lengths are pinned to the top edge of the
//! panel and labelled `∞`.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::summary::{DomainSummary, SummaryPoint};

/// Default directory for rendered figures.
pub const DEFAULT_FIGURES_DIR: &str = "results/figures";

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 600.0;
const PANEL_WIDTH: f64 = WIDTH / 2.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 90.0;
const GRID_LINES: usize = 5;

const HSP_COLOR: &str = "#1f3fbf";
const MCTS_COLOR: &str = "#d62728";
const X_LABEL: &str = "Problems (ordered by HSP difficulty)";

#[derive(Clone, Copy)]
enum Marker {
    Circle,
    Square,
}

struct Series<'a> {
    label: &'a str,
    color: &'a str,
    marker: Marker,
    values: Vec<f64>,
}

/// File name for a domain's figure.
pub fn figure_file_name(domain: &str) -> String {
    format!("{domain}_comparison.svg")
}

/// Render every summary to `<dir>/<domain>_comparison.svg`, creating `dir`
/// as needed. Returns the written paths; nothing is written for an empty
/// slice.
pub fn render_figures(summaries: &[DomainSummary], dir: &Path) -> Result<Vec<PathBuf>> {
    if summaries.is_empty() {
        tracing::info!("no results to plot");
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create figures directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(summaries.len());
    for summary in summaries {
        let path = dir.join(figure_file_name(&summary.domain));
        std::fs::write(&path, render_comparison(summary))
            .with_context(|| format!("failed to write figure {}", path.display()))?;
        tracing::debug!(domain = %summary.domain, path = %path.display(), "figure written");
        written.push(path);
    }
    Ok(written)
}

/// Render one domain's two-panel comparison as an SVG document.
pub fn render_comparison(summary: &DomainSummary) -> String {
    ComparisonSvg(summary).to_string()
}

struct ComparisonSvg<'a>(&'a DomainSummary);

impl fmt::Display for ComparisonSvg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        let title = capitalize(&summary.domain);
        let problems: Vec<&str> = summary.points.iter().map(|p| p.problem.as_str()).collect();

        let runtime = [
            series(summary, "HSP", HSP_COLOR, Marker::Circle, |p| p.hsp_runtime),
            series(summary, "MCTS", MCTS_COLOR, Marker::Square, |p| p.mcts_runtime),
        ];
        let length = [
            series(summary, "HSP", HSP_COLOR, Marker::Circle, |p| p.hsp_length),
            series(summary, "MCTS", MCTS_COLOR, Marker::Square, |p| p.mcts_length),
        ];

        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
        )?;
        writeln!(f, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        panel(
            f,
            0.0,
            &format!("{title} - Runtime Comparison"),
            "Runtime (seconds)",
            &problems,
            &runtime,
        )?;
        panel(
            f,
            PANEL_WIDTH,
            &format!("{title} - Plan Length Comparison"),
            "Plan Length",
            &problems,
            &length,
        )?;
        writeln!(f, "</svg>")
    }
}

fn series<'a>(
    summary: &DomainSummary,
    label: &'a str,
    color: &'a str,
    marker: Marker,
    value: impl Fn(&SummaryPoint) -> f64,
) -> Series<'a> {
    Series {
        label,
        color,
        marker,
        values: summary.points.iter().map(value).collect(),
    }
}

fn panel(
    f: &mut fmt::Formatter<'_>,
    x0: f64,
    title: &str,
    y_label: &str,
    problems: &[&str],
    series: &[Series<'_>],
) -> fmt::Result {
    let left = x0 + MARGIN_LEFT;
    let right = x0 + PANEL_WIDTH - MARGIN_RIGHT;
    let top = MARGIN_TOP;
    let bottom = HEIGHT - MARGIN_BOTTOM;

    let y_max = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    // Headroom above the tallest finite point, with a floor for all-zero data.
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let n = problems.len();
    let x_at = |i: usize| {
        if n <= 1 {
            (left + right) / 2.0
        } else {
            left + (right - left) * i as f64 / (n - 1) as f64
        }
    };
    let y_at = |v: f64| {
        if v.is_finite() {
            bottom - (bottom - top) * (v / y_max)
        } else {
            top
        }
    };

    writeln!(f, "<g>")?;
    writeln!(
        f,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16" font-weight="bold">{}</text>"#,
        (left + right) / 2.0,
        top - 25.0,
        escape(title)
    )?;

    // Horizontal grid with tick labels.
    for k in 0..=GRID_LINES {
        let v = y_max * k as f64 / GRID_LINES as f64;
        let y = y_at(v);
        writeln!(
            f,
            r##"<line x1="{left:.1}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="#000" stroke-opacity="0.3" stroke-width="0.5"/>"##
        )?;
        writeln!(
            f,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{}</text>"#,
            left - 6.0,
            y + 4.0,
            tick_label(v)
        )?;
    }

    // Vertical grid and problem labels.
    for (i, problem) in problems.iter().enumerate() {
        let x = x_at(i);
        writeln!(
            f,
            r##"<line x1="{x:.1}" y1="{top:.1}" x2="{x:.1}" y2="{bottom:.1}" stroke="#000" stroke-opacity="0.3" stroke-width="0.5"/>"##
        )?;
        let label_y = bottom + 14.0;
        writeln!(
            f,
            r#"<text x="{x:.1}" y="{label_y:.1}" text-anchor="end" font-size="10" transform="rotate(-35 {x:.1} {label_y:.1})">{}</text>"#,
            escape(problem)
        )?;
    }

    // Axes.
    writeln!(
        f,
        r##"<polyline points="{left:.1},{top:.1} {left:.1},{bottom:.1} {right:.1},{bottom:.1}" fill="none" stroke="#000" stroke-width="1"/>"##
    )?;
    writeln!(
        f,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13">{}</text>"#,
        (left + right) / 2.0,
        HEIGHT - 15.0,
        X_LABEL
    )?;
    let mid_y = (top + bottom) / 2.0;
    let label_x = x0 + 20.0;
    writeln!(
        f,
        r#"<text x="{label_x:.1}" y="{mid_y:.1}" text-anchor="middle" font-size="13" transform="rotate(-90 {label_x:.1} {mid_y:.1})">{}</text>"#,
        escape(y_label)
    )?;

    for s in series {
        // Lines join consecutive finite points only.
        for (i, pair) in s.values.windows(2).enumerate() {
            if pair[0].is_finite() && pair[1].is_finite() {
                writeln!(
                    f,
                    r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="2"/>"#,
                    x_at(i),
                    y_at(pair[0]),
                    x_at(i + 1),
                    y_at(pair[1]),
                    s.color
                )?;
            }
        }
        for (i, &v) in s.values.iter().enumerate() {
            let (x, y) = (x_at(i), y_at(v));
            let fill = if v.is_finite() { s.color } else { "white" };
            marker(f, s.marker, x, y, s.color, fill)?;
            if !v.is_finite() {
                writeln!(
                    f,
                    r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12" fill="{}">∞</text>"#,
                    x,
                    y - 8.0,
                    s.color
                )?;
            }
        }
    }

    // Legend, top-left inside the plot area.
    for (row, s) in series.iter().enumerate() {
        let ly = top + 18.0 + row as f64 * 20.0;
        let lx = left + 12.0;
        writeln!(
            f,
            r#"<line x1="{lx:.1}" y1="{ly:.1}" x2="{:.1}" y2="{ly:.1}" stroke="{}" stroke-width="2"/>"#,
            lx + 24.0,
            s.color
        )?;
        marker(f, s.marker, lx + 12.0, ly, s.color, s.color)?;
        writeln!(
            f,
            r#"<text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
            lx + 32.0,
            ly + 4.0,
            s.label
        )?;
    }
    writeln!(f, "</g>")
}

fn marker(f: &mut fmt::Formatter<'_>, kind: Marker, x: f64, y: f64, stroke: &str, fill: &str) -> fmt::Result {
    match kind {
        Marker::Circle => writeln!(
            f,
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="4" fill="{fill}" stroke="{stroke}" stroke-width="1.5"/>"#
        ),
        Marker::Square => writeln!(
            f,
            r#"<rect x="{:.1}" y="{:.1}" width="8" height="8" fill="{fill}" stroke="{stroke}" stroke-width="1.5"/>"#,
            x - 4.0,
            y - 4.0
        ),
    }
}

fn tick_label(v: f64) -> String {
    if v >= 100.0 || v == v.trunc() {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
