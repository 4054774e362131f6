//! Command requests and their outcomes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to do when the last attempt still exits non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailPolicy {
    #[default]
    RaiseOnNonZero,
    ReturnResult,
}

/// A single logical command submitted to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub argv: Vec<String>,
    pub use_privilege_elevation: bool,
    /// `None` falls back to the engine's configured default
    pub retry_limit: Option<u32>,
    pub quiet: bool,
    pub fail_policy: FailPolicy,
    pub current_dir: Option<PathBuf>,
    pub environment: Vec<(String, String)>,
}

impl CommandInvocation {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            use_privilege_elevation: false,
            retry_limit: None,
            quiet: false,
            fail_policy: FailPolicy::default(),
            current_dir: None,
            environment: Vec::new(),
        }
    }

    /// Runs `script` through `sh -c`. Quoting and injection are the caller's problem.
    pub fn shell(script: impl Into<String>) -> Self {
        Self::new(["sh".to_string(), "-c".to_string(), script.into()])
    }

    pub fn elevated(mut self, elevated: bool) -> Self {
        self.use_privilege_elevation = elevated;
        self
    }

    pub fn retries(mut self, retry_limit: u32) -> Self {
        self.retry_limit = Some(retry_limit);
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn fail_policy(mut self, policy: FailPolicy) -> Self {
        self.fail_policy = policy;
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.push((key.into(), value.into()));
        self
    }
}

/// Outcome of the last attempt of an invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub command: String,
    pub exit_code: i32,
    pub stdout_text: String,
    pub stderr_text: String,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Joins argv for log lines and error messages
pub fn command_text(argv: &[String]) -> String {
    shell_words::join(argv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let invocation = CommandInvocation::new(["apt-get", "update"]);
        assert_eq!(invocation.argv, vec!["apt-get", "update"]);
        assert!(!invocation.use_privilege_elevation);
        assert_eq!(invocation.retry_limit, None);
        assert!(!invocation.quiet);
        assert_eq!(invocation.fail_policy, FailPolicy::RaiseOnNonZero);
    }

    #[test]
    fn test_shell_wraps_script() {
        let invocation = CommandInvocation::shell("ls | wc -l");
        assert_eq!(invocation.argv, vec!["sh", "-c", "ls | wc -l"]);
    }

    #[test]
    fn test_command_text_quotes_arguments() {
        let argv = vec!["sh".to_string(), "-c".to_string(), "echo hi".to_string()];
        assert_eq!(command_text(&argv), "sh -c 'echo hi'");
    }
}
