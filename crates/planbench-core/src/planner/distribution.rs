/// Where the PDDL4J planners live and how to start the JVM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pddl4jDistribution {
    /// The `java` launcher. Defaults to `"java"` (found via `$PATH`).
    pub java: String,
    /// Classpath entry holding the PDDL4J planners (usually the jar).
    pub classpath: String,
    /// Extra classpath entry for the MCTS planner classes.
    pub mcts_extra_classpath: String,
}

impl Pddl4jDistribution {
    pub const DEFAULT_JAVA: &str = "java";
    pub const DEFAULT_MCTS_EXTRA_CLASSPATH: &str = "target/classes";

    /// Distribution at `classpath`, with the default launcher and MCTS
    /// class directory.
    pub fn new(classpath: impl Into<String>) -> Self {
        Self {
            java: Self::DEFAULT_JAVA.to_owned(),
            classpath: classpath.into(),
            mcts_extra_classpath: Self::DEFAULT_MCTS_EXTRA_CLASSPATH.to_owned(),
        }
    }

    /// Use a different `java` launcher.
    pub fn java(mut self, java: impl Into<String>) -> Self {
        self.java = java.into();
        self
    }

    /// Use a different class directory for the MCTS planner.
    pub fn mcts_extra_classpath(mut self, path: impl Into<String>) -> Self {
        self.mcts_extra_classpath = path.into();
        self
    }

    /// Classpath for the MCTS planner: the distribution plus its extra entry.
    pub fn mcts_classpath(&self) -> String {
        if self.mcts_extra_classpath.is_empty() {
            return self.classpath.clone();
        }
        format!(
            "{}{}{}",
            self.classpath,
            classpath_separator(),
            self.mcts_extra_classpath
        )
    }
}

fn classpath_separator() -> char {
    if cfg!(windows) { ';' } else { ':' }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_defaults() {
        let dist = Pddl4jDistribution::new("lib/pddl4j.jar");
        assert_eq!(dist.java, "java");
        assert_eq!(dist.classpath, "lib/pddl4j.jar");
        assert_eq!(dist.mcts_extra_classpath, "target/classes");
    }

    #[cfg(unix)]
    #[test]
    fn mcts_classpath_appends_extra_entry() {
        let dist = Pddl4jDistribution::new("lib/pddl4j.jar");
        assert_eq!(dist.mcts_classpath(), "lib/pddl4j.jar:target/classes");
    }

    #[test]
    fn empty_extra_entry_is_dropped() {
        let dist = Pddl4jDistribution::new("lib/pddl4j.jar").mcts_extra_classpath("");
        assert_eq!(dist.mcts_classpath(), "lib/pddl4j.jar");
    }
}
