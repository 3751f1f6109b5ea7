mod config;
mod plot_cmd;
mod report_cmd;
mod run_cmd;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use config::{BenchConfig, ConfigFile, Overrides};

#[derive(Parser)]
#[command(name = "planbench", about = "Benchmark the PDDL4J HSP and MCTS planners against each other")]
struct Cli {
    /// Config file (defaults to ~/.config/planbench/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file with the default settings
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Run both planners on every problem and write results and figures
    Run {
        /// Path to the PDDL4J jar (or class directory)
        #[arg(long)]
        pddl4j_path: String,
        /// Directory holding one sub-directory per domain [default: pddl]
        #[arg(long)]
        domains_path: Option<PathBuf>,
        /// Timeout per planner run in seconds [default: 300]
        #[arg(long)]
        timeout: Option<u64>,
        /// Number of MCTS random walks [default: 1000]
        #[arg(long)]
        walks: Option<u32>,
        /// Maximum MCTS walk length [default: 100]
        #[arg(long)]
        walk_length: Option<u32>,
        /// Java launcher [default: java]
        #[arg(long)]
        java: Option<String>,
        /// Results file [default: benchmark_results.json]
        #[arg(long)]
        output: Option<PathBuf>,
        /// Directory for comparison figures [default: results/figures]
        #[arg(long)]
        figures_dir: Option<PathBuf>,
    },
    /// Print a table of a saved results file
    Report {
        /// Results file [default: benchmark_results.json]
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Render comparison figures from a saved results file
    Plot {
        /// Results file [default: benchmark_results.json]
        #[arg(long)]
        input: Option<PathBuf>,
        /// Directory for comparison figures [default: results/figures]
        #[arg(long)]
        figures_dir: Option<PathBuf>,
    },
}

/// Cancel the returned token on the first Ctrl+C; exit on the second.
///
/// Planners run in their own process group and never see the terminal's
/// SIGINT, so the harness has to kill them itself before exiting.
fn shutdown_token() -> CancellationToken {
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();

    tokio::spawn(async move {
        let mut got_first_signal = false;
        loop {
            tokio::signal::ctrl_c().await.ok();
            if std::mem::replace(&mut got_first_signal, true) {
                eprintln!("\nForce exit.");
                std::process::exit(130);
            }
            eprintln!("\nStopping the running planner (Ctrl+C again to force)...");
            cancel_clone.cancel();
        }
    });
    cancel
}

/// Execute the `planbench init` command: write config file.
fn cmd_init(path: &std::path::Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    config::save_config(path, &ConfigFile::with_defaults())?;
    println!("Config written to {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(config::config_path);

    match cli.command {
        Commands::Init { force } => {
            cmd_init(&config_path, force)?;
        }
        Commands::Run {
            pddl4j_path,
            domains_path,
            timeout,
            walks,
            walk_length,
            java,
            output,
            figures_dir,
        } => {
            let overrides = Overrides {
                java,
                timeout_secs: timeout,
                walks,
                walk_length,
                domains_path,
                results_file: output,
                figures_dir,
            };
            let cfg = BenchConfig::resolve(&overrides, &config_path)?;
            run_cmd::run_benchmark(&pddl4j_path, &cfg, shutdown_token()).await?;
        }
        Commands::Report { input } => {
            let overrides = Overrides {
                results_file: input,
                ..Overrides::default()
            };
            let cfg = BenchConfig::resolve(&overrides, &config_path)?;
            report_cmd::run_report(&cfg.results_file)?;
        }
        Commands::Plot { input, figures_dir } => {
            let overrides = Overrides {
                results_file: input,
                figures_dir,
                ..Overrides::default()
            };
            let cfg = BenchConfig::resolve(&overrides, &config_path)?;
            plot_cmd::run_plot(&cfg.results_file, &cfg.figures_dir)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_requires_pddl4j_path() {
        assert!(Cli::try_parse_from(["planbench", "run"]).is_err());
    }

    #[test]
    fn run_parses_flags() {
        let cli = Cli::try_parse_from([
            "planbench",
            "run",
            "--pddl4j-path",
            "lib/pddl4j.jar",
            "--timeout",
            "60",
            "--walks",
            "200",
        ])
        .unwrap();

        match cli.command {
            Commands::Run {
                pddl4j_path,
                timeout,
                walks,
                domains_path,
                ..
            } => {
                assert_eq!(pddl4j_path, "lib/pddl4j.jar");
                assert_eq!(timeout, Some(60));
                assert_eq!(walks, Some(200));
                assert!(domains_path.is_none());
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        cmd_init(&path, false).unwrap();
        assert!(cmd_init(&path, false).is_err());
        cmd_init(&path, true).unwrap();

        let loaded = config::load_config(&path).unwrap().unwrap();
        assert_eq!(loaded, ConfigFile::with_defaults());
    }
}
