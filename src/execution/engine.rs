//! Command execution engine: elevation, retries and failure policy

use crate::execution::capture::{run_attempt, trimmed_text, AttemptOutput};
use crate::execution::config::EngineConfig;
use crate::execution::error::ExecutionError;
use crate::execution::invocation::{command_text, CommandInvocation, ExecutionResult, FailPolicy};
use crate::execution::lookup::{self, CommandLookup, ResolvedCommand};
use tracing::{debug, error, info, warn};

/// Runs command invocations against the local host
#[derive(Debug, Clone, Default)]
pub struct CommandEngine {
    config: EngineConfig,
}

impl CommandEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Changes apply to every later invocation; nothing is cached.
    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    /// Executes `invocation`, retrying sequentially until it exits zero or
    /// the retry limit is used up. The result always describes the last attempt.
    pub async fn execute(
        &self,
        invocation: &CommandInvocation,
    ) -> Result<ExecutionResult, ExecutionError> {
        let argv = self.prepare_argv(invocation).await?;
        self.execute_argv(&argv, invocation).await
    }

    /// The attempt loop behind [`execute`](Self::execute), for an argv that
    /// is already final. Elevation is not looked at here.
    pub(crate) async fn execute_argv(
        &self,
        argv: &[String],
        invocation: &CommandInvocation,
    ) -> Result<ExecutionResult, ExecutionError> {
        let command = command_text(argv);
        let attempts = self.attempts_for(invocation);

        let mut last = None;
        for attempt in 1..=attempts {
            if invocation.quiet {
                debug!("Running ({}/{}): {}", attempt, attempts, command);
            } else {
                info!("Running ({}/{}): {}", attempt, attempts, command);
            }

            let output = run_attempt(argv, invocation).await?;
            let exit_code = output.exit_code;
            last = Some(output);

            if exit_code == 0 {
                break;
            }
            if invocation.quiet {
                debug!(
                    "Attempt {}/{} of \"{}\" exited with {}",
                    attempt, attempts, command, exit_code
                );
            } else {
                warn!(
                    "Attempt {}/{} of \"{}\" exited with {}",
                    attempt, attempts, command, exit_code
                );
            }
        }

        let AttemptOutput {
            exit_code,
            stdout,
            stderr,
        } = last.ok_or(ExecutionError::EmptyCommand)?;

        if exit_code != 0 && invocation.fail_policy == FailPolicy::RaiseOnNonZero {
            error!(
                "Command \"{}\" failed after {} attempt(s) with exit code {}",
                command, attempts, exit_code
            );
            return Err(ExecutionError::CommandFailed { command, exit_code });
        }

        Ok(ExecutionResult {
            command,
            exit_code,
            stdout_text: trimmed_text(&stdout),
            stderr_text: trimmed_text(&stderr),
        })
    }

    /// Convenience for a one-off command with engine defaults.
    pub async fn run<I, S>(&self, argv: I) -> Result<ExecutionResult, ExecutionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.execute(&CommandInvocation::new(argv)).await
    }

    /// The argv that `execute` would spawn, including the elevation prefix
    /// when one is requested and resolvable.
    pub async fn prepare_argv(
        &self,
        invocation: &CommandInvocation,
    ) -> Result<Vec<String>, ExecutionError> {
        if invocation.argv.is_empty() {
            return Err(ExecutionError::EmptyCommand);
        }

        let mut argv = invocation.argv.clone();
        if !invocation.use_privilege_elevation {
            return Ok(argv);
        }

        let elevation = &self.config.elevation_command;
        if argv.first() == Some(elevation) {
            return Ok(argv);
        }

        match self.lookup_command(elevation).await? {
            CommandLookup::Found(_) => {
                argv.insert(0, elevation.clone());
            }
            CommandLookup::NotFound => {
                let unavailable = ExecutionError::ElevationUnavailable {
                    command: elevation.clone(),
                };
                warn!("{}, running without elevation", unavailable);
            }
        }
        Ok(argv)
    }

    /// Whether `name` is known to the shell, and as what.
    pub async fn lookup_command(&self, name: &str) -> Result<CommandLookup, ExecutionError> {
        lookup::lookup_command(self, name).await
    }

    /// Like [`lookup_command`](Self::lookup_command) but a miss is an error.
    pub async fn resolve_command(&self, name: &str) -> Result<ResolvedCommand, ExecutionError> {
        lookup::resolve_command(self, name).await
    }

    fn attempts_for(&self, invocation: &CommandInvocation) -> u32 {
        invocation
            .retry_limit
            .unwrap_or(self.config.default_retry_limit)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_retry_limit_still_runs_once() {
        let engine = CommandEngine::default();
        let invocation = CommandInvocation::new(["true"]).retries(0);
        assert_eq!(engine.attempts_for(&invocation), 1);
    }

    #[test]
    fn test_retry_limit_falls_back_to_config() {
        let engine = CommandEngine::new(EngineConfig::default().with_retry_limit(7));
        assert_eq!(engine.attempts_for(&CommandInvocation::new(["true"])), 7);
        assert_eq!(
            engine.attempts_for(&CommandInvocation::new(["true"]).retries(2)),
            2
        );
    }

    #[tokio::test]
    async fn test_empty_argv_rejected() {
        let engine = CommandEngine::default();
        let invocation = CommandInvocation::new(Vec::<String>::new());
        let result = engine.execute(&invocation).await;
        assert!(matches!(result, Err(ExecutionError::EmptyCommand)));
    }

    #[tokio::test]
    async fn test_config_mutation_visible_to_next_call() {
        let mut engine = CommandEngine::default();
        let invocation = CommandInvocation::new(["echo", "hi"]).elevated(true);

        engine.config_mut().elevation_command = "env".to_string();
        let argv = engine.prepare_argv(&invocation).await.unwrap();
        assert_eq!(argv, vec!["env", "echo", "hi"]);

        engine.config_mut().elevation_command = "no-such-elevation-tool-xyz".to_string();
        let argv = engine.prepare_argv(&invocation).await.unwrap();
        assert_eq!(argv, vec!["echo", "hi"]);
    }
}
