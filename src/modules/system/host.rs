//! Host and environment queries

use crate::execution::{CommandEngine, CommandInvocation, FailPolicy};
use crate::modules::error::ModuleError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const OS_RELEASE: &str = "/etc/os-release";

/// Variables whose presence means we run under continuous integration
const CI_VARIABLES: &[&str] = &["CI", "TRAVIS", "GITHUB_ACTIONS"];

/// Parses the `KEY=value` lines of an os-release file
pub fn parse_os_release(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            (
                key.trim().to_string(),
                value.trim().trim_matches('"').trim_matches('\'').to_string(),
            )
        })
        .collect()
}

fn os_release_field(path: &Path, key: &str) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_os_release(&content)
        .remove(key)
        .filter(|value| !value.is_empty())
}

/// Release codename, e.g. `jammy` or `bookworm`
pub async fn linux_release_name(engine: &CommandEngine) -> Result<String, ModuleError> {
    if let Some(codename) = os_release_field(Path::new(OS_RELEASE), "VERSION_CODENAME") {
        return Ok(codename);
    }
    debug!("VERSION_CODENAME missing from {}, asking lsb_release", OS_RELEASE);
    lsb_release(engine, "-c", "release name").await
}

/// Release number, e.g. `22.04` or `12`
pub async fn linux_release_number(engine: &CommandEngine) -> Result<String, ModuleError> {
    if let Some(version) = os_release_field(Path::new(OS_RELEASE), "VERSION_ID") {
        return Ok(version);
    }
    debug!("VERSION_ID missing from {}, asking lsb_release", OS_RELEASE);
    lsb_release(engine, "-r", "release number").await
}

async fn lsb_release(engine: &CommandEngine, flag: &str, fact: &str) -> Result<String, ModuleError> {
    let invocation = CommandInvocation::new(["lsb_release", flag, "-s"])
        .quiet(true)
        .retries(1)
        .fail_policy(FailPolicy::ReturnResult);
    let result = engine.execute(&invocation).await?;

    let value = result.stdout_text.trim();
    if !result.success() || value.is_empty() {
        return Err(ModuleError::FactUnavailable {
            fact: fact.to_string(),
        });
    }
    Ok(value.to_string())
}

#[cfg(unix)]
pub fn current_username() -> Result<String, ModuleError> {
    use nix::unistd::{getuid, User};

    let uid = getuid();
    match User::from_uid(uid)? {
        Some(user) => Ok(user.name),
        None => Err(ModuleError::UnknownUser {
            name: uid.to_string(),
        }),
    }
}

#[cfg(not(unix))]
pub fn current_username() -> Result<String, ModuleError> {
    std::env::var("USERNAME").map_err(|_| ModuleError::MissingEnvironment {
        name: "USERNAME".to_string(),
    })
}

/// Home directory from the user database, independent of `$HOME`
#[cfg(unix)]
pub fn home_dir_of(username: &str) -> Result<PathBuf, ModuleError> {
    match nix::unistd::User::from_name(username)? {
        Some(user) => Ok(user.dir),
        None => Err(ModuleError::UnknownUser {
            name: username.to_string(),
        }),
    }
}

#[cfg(not(unix))]
pub fn home_dir_of(username: &str) -> Result<PathBuf, ModuleError> {
    if current_username()? == username {
        return home_dir_current_user();
    }
    Err(ModuleError::UnknownUser {
        name: username.to_string(),
    })
}

pub fn home_dir_current_user() -> Result<PathBuf, ModuleError> {
    #[cfg(unix)]
    {
        if let Ok(home) = current_username().and_then(|name| home_dir_of(&name)) {
            return Ok(home);
        }
    }
    dirs::home_dir().ok_or_else(|| ModuleError::FactUnavailable {
        fact: "home directory".to_string(),
    })
}

pub fn display() -> Result<String, ModuleError> {
    std::env::var("DISPLAY").map_err(|_| ModuleError::MissingEnvironment {
        name: "DISPLAY".to_string(),
    })
}

pub fn is_ci() -> bool {
    CI_VARIABLES
        .iter()
        .any(|name| std::env::var_os(name).is_some_and(|v| !v.is_empty()))
}
