//! Shared test utilities for planbench integration tests.
//!
//! Provides stand-ins for the external planners (small shell scripts with a
//! scripted stdout, exit code and delay) and on-disk PDDL suites laid out
//! the way `planbench_core::suite::discover` expects.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Behaviour of a fake planner script.
#[derive(Debug, Clone)]
pub struct FakePlanner {
    stdout: String,
    stderr: String,
    exit_code: i32,
    sleep_secs: u64,
}

impl FakePlanner {
    /// A planner that prints `stdout` and exits 0.
    pub fn printing(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: 0,
            sleep_secs: 0,
        }
    }

    /// A planner that never finishes within any reasonable test timeout.
    pub fn hanging() -> Self {
        Self::printing("").sleep_secs(600)
    }

    pub fn stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    pub fn sleep_secs(mut self, secs: u64) -> Self {
        self.sleep_secs = secs;
        self
    }

    /// Write the script to `dir/name` and make it executable.
    ///
    /// Besides its scripted output, the script appends its own arguments
    /// (one per line) to `dir/name.args` and its pid to `dir/name.pid`, so
    /// tests can check the command line and that the process is gone.
    /// A sleeping planner sleeps in a background child whose pid goes to
    /// `dir/name.child.pid`, the way a launcher script leaves a JVM behind.
    #[cfg(unix)]
    pub fn install(&self, dir: &Path, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        let args_file = dir.join(format!("{name}.args"));
        let pid_file = dir.join(format!("{name}.pid"));
        let child_pid_file = dir.join(format!("{name}.child.pid"));
        let script = format!(
            "#!/bin/sh\n\
             echo $$ > '{pid}'\n\
             for a in \"$@\"; do echo \"$a\" >> '{args}'; done\n\
             cat <<'PLANBENCH_STDOUT'\n{stdout}\nPLANBENCH_STDOUT\n\
             cat >&2 <<'PLANBENCH_STDERR'\n{stderr}\nPLANBENCH_STDERR\n\
             {sleep}\
             exit {code}\n",
            pid = pid_file.display(),
            args = args_file.display(),
            stdout = self.stdout,
            stderr = self.stderr,
            sleep = if self.sleep_secs > 0 {
                format!(
                    "sleep {} &\necho $! > '{}'\nwait $!\n",
                    self.sleep_secs,
                    child_pid_file.display()
                )
            } else {
                String::new()
            },
            code = self.exit_code,
        );

        std::fs::write(&path, script).expect("failed to write fake planner");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("failed to make fake planner executable");
        path
    }
}

/// Arguments recorded by every invocation of the fake planner `name`.
pub fn recorded_args(dir: &Path, name: &str) -> Vec<String> {
    std::fs::read_to_string(dir.join(format!("{name}.args")))
        .unwrap_or_default()
        .lines()
        .map(str::to_owned)
        .collect()
}

/// Pid written by the most recent invocation of the fake planner `name`.
pub fn recorded_pid(dir: &Path, name: &str) -> Option<i32> {
    std::fs::read_to_string(dir.join(format!("{name}.pid")))
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

/// Pid of the background child started by the most recent invocation of
/// the sleeping fake planner `name`.
pub fn recorded_child_pid(dir: &Path, name: &str) -> Option<i32> {
    recorded_pid(dir, &format!("{name}.child"))
}

/// Whether a process with `pid` still exists (zombies excluded).
#[cfg(target_os = "linux")]
pub fn process_alive(pid: i32) -> bool {
    match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
        // The state field follows the parenthesised command name.
        Ok(stat) => stat
            .rsplit_once(')')
            .and_then(|(_, rest)| rest.split_whitespace().next())
            .is_some_and(|state| state != "Z"),
        Err(_) => false,
    }
}

/// A temporary `pddl/` tree built up one domain at a time.
pub struct PddlSuite {
    dir: TempDir,
}

impl PddlSuite {
    /// An empty `<tmp>/pddl/` directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        std::fs::create_dir_all(dir.path().join("pddl")).expect("failed to create pddl dir");
        Self { dir }
    }

    /// Add `pddl/<domain>/domain.pddl` and one `pddl/<domain>/<problem>.pddl`
    /// per problem.
    pub fn domain(self, domain: &str, problems: &[&str]) -> Self {
        let domain_dir = self.root().join(domain);
        std::fs::create_dir_all(&domain_dir).expect("failed to create domain dir");
        std::fs::write(
            domain_dir.join("domain.pddl"),
            format!("(define (domain {domain}))\n"),
        )
        .expect("failed to write domain file");
        for problem in problems {
            std::fs::write(
                domain_dir.join(format!("{problem}.pddl")),
                format!("(define (problem {problem}) (:domain {domain}))\n"),
            )
            .expect("failed to write problem file");
        }
        self
    }

    /// The `pddl/` directory.
    pub fn root(&self) -> PathBuf {
        self.dir.path().join("pddl")
    }

    /// Scratch directory next to `pddl/` for scripts and outputs.
    pub fn scratch(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for PddlSuite {
    fn default() -> Self {
        Self::new()
    }
}
