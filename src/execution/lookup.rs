//! Command resolution through the shell's own `type` / `command -v`

use crate::execution::engine::CommandEngine;
use crate::execution::error::ExecutionError;
use crate::execution::invocation::{CommandInvocation, FailPolicy};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// What kind of thing the shell resolves a name to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Alias,
    Keyword,
    Function,
    Builtin,
    File,
}

impl FromStr for CommandKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alias" => Ok(CommandKind::Alias),
            "keyword" => Ok(CommandKind::Keyword),
            "function" => Ok(CommandKind::Function),
            "builtin" => Ok(CommandKind::Builtin),
            "file" => Ok(CommandKind::File),
            other => Err(format!("unknown command kind: {other}")),
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CommandKind::Alias => "alias",
            CommandKind::Keyword => "keyword",
            CommandKind::Function => "function",
            CommandKind::Builtin => "builtin",
            CommandKind::File => "file",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedCommand {
    pub kind: CommandKind,
    /// Absolute path for files, the bare name for builtins and keywords
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLookup {
    Found(ResolvedCommand),
    NotFound,
}

pub async fn lookup_command(
    engine: &CommandEngine,
    name: &str,
) -> Result<CommandLookup, ExecutionError> {
    if name.trim().is_empty() {
        return Ok(CommandLookup::NotFound);
    }

    if which::which("bash").is_err() {
        debug!("bash not available, falling back to PATH search for {}", name);
        return Ok(match which::which(name) {
            Ok(path) => CommandLookup::Found(ResolvedCommand {
                kind: CommandKind::File,
                path: path.to_string_lossy().into_owned(),
            }),
            Err(_) => CommandLookup::NotFound,
        });
    }

    let Some(kind) = bash_query(engine, "type -t \"$1\"", name).await? else {
        return Ok(CommandLookup::NotFound);
    };
    let kind = match kind.parse::<CommandKind>() {
        Ok(kind) => kind,
        Err(reason) => {
            debug!("{} for {}", reason, name);
            return Ok(CommandLookup::NotFound);
        }
    };

    let Some(path) = bash_query(engine, "command -v \"$1\"", name).await? else {
        return Ok(CommandLookup::NotFound);
    };

    Ok(CommandLookup::Found(ResolvedCommand { kind, path }))
}

pub async fn resolve_command(
    engine: &CommandEngine,
    name: &str,
) -> Result<ResolvedCommand, ExecutionError> {
    match lookup_command(engine, name).await? {
        CommandLookup::Found(resolved) => Ok(resolved),
        CommandLookup::NotFound => Err(ExecutionError::CommandNotFound {
            name: name.to_string(),
        }),
    }
}

/// Runs `script` with `name` as `$1`, so the name is never parsed as shell code.
async fn bash_query(
    engine: &CommandEngine,
    script: &str,
    name: &str,
) -> Result<Option<String>, ExecutionError> {
    let invocation = CommandInvocation::new(["bash", "-c", script, "bash", name])
        .quiet(true)
        .retries(1)
        .fail_policy(FailPolicy::ReturnResult);
    let result = engine.execute_argv(&invocation.argv, &invocation).await?;

    let text = result.stdout_text.trim();
    if !result.success() || text.is_empty() {
        return Ok(None);
    }
    Ok(Some(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("builtin".parse::<CommandKind>(), Ok(CommandKind::Builtin));
        assert_eq!("file".parse::<CommandKind>(), Ok(CommandKind::File));
        assert!("".parse::<CommandKind>().is_err());
    }

    #[tokio::test]
    async fn test_blank_name_not_found() {
        let engine = CommandEngine::default();
        assert_eq!(
            lookup_command(&engine, "  ").await.unwrap(),
            CommandLookup::NotFound
        );
    }

    #[tokio::test]
    async fn test_lookup_runs_on_engine_config() {
        use crate::execution::config::EngineConfig;

        // Queries pin their own attempt count and never look up the elevation command
        let engine = CommandEngine::new(
            EngineConfig::default()
                .with_retry_limit(5)
                .with_elevation_command("no-such-elevation-tool-xyz"),
        );
        match lookup_command(&engine, "sh").await.unwrap() {
            CommandLookup::Found(resolved) => {
                assert_eq!(resolved.kind, CommandKind::File);
                assert!(resolved.path.ends_with("sh"));
            }
            CommandLookup::NotFound => panic!("sh should resolve"),
        }
        assert_eq!(
            lookup_command(&engine, "definitely-not-a-real-command-xyz")
                .await
                .unwrap(),
            CommandLookup::NotFound
        );
    }

    #[tokio::test]
    async fn test_name_is_not_evaluated() {
        let engine = CommandEngine::default();
        let lookup = lookup_command(&engine, "true; echo injected")
            .await
            .unwrap();
        assert_eq!(lookup, CommandLookup::NotFound);
    }
}
