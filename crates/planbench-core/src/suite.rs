//! Discovery of benchmark problems on disk.
//!
//! Expected layout:
//!
//! ```text
//! pddl/
//!   blocksworld/
//!     domain.pddl
//!     p01.pddl
//!     p02.pddl
//!   gripper/
//!     domain.pddl
//!     p01.pddl
//! ```
//!
//! Every subdirectory with a `domain.pddl` is a domain; every other `.pddl`
//! file beside it is a problem.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Default directory holding the domains.
pub const DEFAULT_DOMAINS_PATH: &str = "pddl";

/// File name of the domain description inside each domain directory.
pub const DOMAIN_FILE_NAME: &str = "domain.pddl";

/// One domain/problem pair to benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkProblem {
    /// Domain identifier (the directory name).
    pub domain: String,
    /// Problem identifier (the problem file stem).
    pub problem: String,
    pub domain_file: PathBuf,
    pub problem_file: PathBuf,
}

/// Find all problems under `domains_path`, sorted by domain then problem
/// file name.
///
/// Directories without a `domain.pddl` are skipped with a warning.
pub fn discover(domains_path: &Path) -> Result<Vec<BenchmarkProblem>> {
    let domain_dirs = sorted_entries(domains_path)?
        .into_iter()
        .filter(|p| p.is_dir())
        .collect::<Vec<_>>();

    let mut problems = Vec::new();
    for dir in domain_dirs {
        let Some(domain) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };

        let domain_file = dir.join(DOMAIN_FILE_NAME);
        if !domain_file.is_file() {
            tracing::warn!(dir = %dir.display(), "skipping directory without {DOMAIN_FILE_NAME}");
            continue;
        }

        let mut found = 0usize;
        for path in sorted_entries(&dir)? {
            if !path.is_file() || path == domain_file || !is_pddl(&path) {
                continue;
            }
            let Some(problem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            problems.push(BenchmarkProblem {
                domain: domain.clone(),
                problem,
                domain_file: domain_file.clone(),
                problem_file: path,
            });
            found += 1;
        }
        tracing::debug!(domain = %domain, problems = found, "discovered domain");
    }

    Ok(problems)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;
    let mut paths = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("failed to list directory {}", dir.display()))?;
    paths.sort();
    Ok(paths)
}

fn is_pddl(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pddl"))
}
