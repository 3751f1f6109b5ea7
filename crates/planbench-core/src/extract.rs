//! Plan-length extraction from raw planner output.
//!
//! Planners report the size of the plan they found in a handful of
//! different phrasings. [`PlanLengthExtractor`] tries an ordered list of
//! patterns (first match wins) and falls back to counting lines that look
//! like action invocations, e.g. `(unstack b a)`.
//!
//! The fallback is a heuristic: any log line that starts with `(` and
//! contains `)` is counted as an action.

use std::sync::LazyLock;

use regex::Regex;

/// Returned when no plan length could be determined.
pub const PLAN_LENGTH_UNKNOWN: i64 = -1;

/// The built-in patterns, highest priority first. Capture group 1 holds the
/// number of actions.
pub const DEFAULT_PATTERNS: [&str; 4] = [
    r"Plan length:\s*([0-9]+)",
    r"Solution found with ([0-9]+) actions",
    r"([0-9]+) actions in the plan",
    r"Steps:\s*([0-9]+)",
];

static DEFAULT_EXTRACTOR: LazyLock<PlanLengthExtractor> =
    LazyLock::new(PlanLengthExtractor::default);

/// Extract the plan length from planner output using the default patterns.
///
/// Returns [`PLAN_LENGTH_UNKNOWN`] when neither a pattern nor the
/// action-line heuristic yields a positive count.
pub fn extract_plan_length(output: &str) -> i64 {
    DEFAULT_EXTRACTOR.extract(output)
}

/// An ordered list of plan-length patterns plus the action-line fallback.
#[derive(Debug, Clone)]
pub struct PlanLengthExtractor {
    patterns: Vec<Regex>,
}

impl Default for PlanLengthExtractor {
    fn default() -> Self {
        let patterns = DEFAULT_PATTERNS
            .iter()
            .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("invalid built-in pattern {p:?}: {e}")))
            .collect();
        Self { patterns }
    }
}

impl PlanLengthExtractor {
    /// An extractor with no patterns; only the action-line fallback applies.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Append a pattern with lower priority than every existing one.
    ///
    /// The pattern must put the action count in capture group 1.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.patterns.push(Regex::new(pattern)?);
        Ok(self)
    }

    /// The patterns in priority order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }

    /// Extract the plan length from `output`.
    pub fn extract(&self, output: &str) -> i64 {
        if let Some(n) = self.match_patterns(output) {
            return n;
        }

        let actions = count_action_lines(output);
        if actions > 0 {
            i64::try_from(actions).unwrap_or(i64::MAX)
        } else {
            PLAN_LENGTH_UNKNOWN
        }
    }

    /// Value captured by the first matching pattern, scanning in order.
    fn match_patterns(&self, output: &str) -> Option<i64> {
        self.patterns.iter().find_map(|re| {
            re.captures(output)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<i64>().ok())
        })
    }
}

/// Count lines that look like an action: after trimming, they start with
/// `(` and contain a `)`.
pub fn count_action_lines(output: &str) -> usize {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('(') && line.contains(')'))
        .count()
}
