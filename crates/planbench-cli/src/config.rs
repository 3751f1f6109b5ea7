//! Configuration file management for planbench.
//!
//! Provides a TOML-based config file at `~/.config/planbench/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use planbench_core::chart::DEFAULT_FIGURES_DIR;
use planbench_core::planner::Pddl4jDistribution;
use planbench_core::planner::mcts::{DEFAULT_WALK_LENGTH, DEFAULT_WALKS};
use planbench_core::results::DEFAULT_RESULTS_FILE;
use planbench_core::suite::DEFAULT_DOMAINS_PATH;

/// Default per-run timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

pub const ENV_JAVA: &str = "PLANBENCH_JAVA";
pub const ENV_TIMEOUT: &str = "PLANBENCH_TIMEOUT";
pub const ENV_DOMAINS_PATH: &str = "PLANBENCH_DOMAINS_PATH";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub planners: PlannersSection,
    pub benchmark: BenchmarkSection,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannersSection {
    pub java: Option<String>,
    pub mcts_extra_classpath: Option<String>,
    pub walks: Option<u32>,
    pub walk_length: Option<u32>,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchmarkSection {
    pub timeout_secs: Option<u64>,
    pub domains_path: Option<PathBuf>,
    pub results_file: Option<PathBuf>,
    pub figures_dir: Option<PathBuf>,
}

impl ConfigFile {
    /// A config with every built-in default spelled out.
    pub fn with_defaults() -> Self {
        Self {
            planners: PlannersSection {
                java: Some(Pddl4jDistribution::DEFAULT_JAVA.to_owned()),
                mcts_extra_classpath: Some(Pddl4jDistribution::DEFAULT_MCTS_EXTRA_CLASSPATH.to_owned()),
                walks: Some(DEFAULT_WALKS.get()),
                walk_length: Some(DEFAULT_WALK_LENGTH.get()),
            },
            benchmark: BenchmarkSection {
                timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
                domains_path: Some(PathBuf::from(DEFAULT_DOMAINS_PATH)),
                results_file: Some(PathBuf::from(DEFAULT_RESULTS_FILE)),
                figures_dir: Some(PathBuf::from(DEFAULT_FIGURES_DIR)),
            },
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the planbench config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/planbench` or
/// `~/.config/planbench`, also on macOS.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("planbench");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("planbench")
}

/// Return the path to the default config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file at `path`. A missing file yields `None`;
/// an unreadable or malformed one is an error.
pub fn load_config(path: &Path) -> Result<Option<ConfigFile>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read config file at {}", path.display()));
        }
    };
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }
    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub java: Option<String>,
    pub timeout_secs: Option<u64>,
    pub walks: Option<u32>,
    pub walk_length: Option<u32>,
    pub domains_path: Option<PathBuf>,
    pub results_file: Option<PathBuf>,
    pub figures_dir: Option<PathBuf>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    pub java: String,
    pub mcts_extra_classpath: String,
    pub walks: NonZeroU32,
    pub walk_length: NonZeroU32,
    pub timeout: Duration,
    pub domains_path: PathBuf,
    pub results_file: PathBuf,
    pub figures_dir: PathBuf,
}

impl BenchConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - java: `--java` > `PLANBENCH_JAVA` > `planners.java` > `"java"`
    /// - timeout: `--timeout` > `PLANBENCH_TIMEOUT` > `benchmark.timeout_secs` > 300
    /// - domains path: `--domains-path` > `PLANBENCH_DOMAINS_PATH` > `benchmark.domains_path` > `pddl`
    /// - everything else: CLI flag > config file > default
    pub fn resolve(overrides: &Overrides, config_path: &Path) -> Result<Self> {
        let file = load_config(config_path)?.unwrap_or_default();

        let java = overrides
            .java
            .clone()
            .or_else(|| env_var(ENV_JAVA))
            .or(file.planners.java)
            .unwrap_or_else(|| Pddl4jDistribution::DEFAULT_JAVA.to_owned());

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => match env_var(ENV_TIMEOUT) {
                Some(raw) => raw
                    .parse::<u64>()
                    .with_context(|| format!("{ENV_TIMEOUT} is not a whole number of seconds: {raw:?}"))?,
                None => file.benchmark.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
        };
        if timeout_secs == 0 {
            bail!("timeout must be at least 1 second");
        }

        let walks = overrides.walks.or(file.planners.walks);
        let walks = positive("walks", walks, DEFAULT_WALKS)?;
        let walk_length = overrides.walk_length.or(file.planners.walk_length);
        let walk_length = positive("walk length", walk_length, DEFAULT_WALK_LENGTH)?;

        let domains_path = overrides
            .domains_path
            .clone()
            .or_else(|| env_var(ENV_DOMAINS_PATH).map(PathBuf::from))
            .or(file.benchmark.domains_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOMAINS_PATH));

        Ok(Self {
            java,
            mcts_extra_classpath: file
                .planners
                .mcts_extra_classpath
                .unwrap_or_else(|| Pddl4jDistribution::DEFAULT_MCTS_EXTRA_CLASSPATH.to_owned()),
            walks,
            walk_length,
            timeout: Duration::from_secs(timeout_secs),
            domains_path,
            results_file: overrides
                .results_file
                .clone()
                .or(file.benchmark.results_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_FILE)),
            figures_dir: overrides
                .figures_dir
                .clone()
                .or(file.benchmark.figures_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FIGURES_DIR)),
        })
    }

    /// The planner distribution rooted at `classpath`.
    pub fn distribution(&self, classpath: &str) -> Pddl4jDistribution {
        Pddl4jDistribution::new(classpath)
            .java(self.java.clone())
            .mcts_extra_classpath(self.mcts_extra_classpath.clone())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn positive(what: &str, value: Option<u32>, default: NonZeroU32) -> Result<NonZeroU32> {
    match value {
        None => Ok(default),
        Some(v) => NonZeroU32::new(v).with_context(|| format!("{what} must be a positive integer")),
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
