use crate::execution::ExecutionError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by package, service, host and file operations
#[derive(Error, Debug)]
pub enum ModuleError {
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("Ambiguous result for {subject}: expected at most one record, found {matches}")]
    AmbiguousQueryResult { subject: String, matches: usize },

    #[error("Timed out after {waited:?} waiting for {path}")]
    Timeout { path: PathBuf, waited: Duration },

    #[error("Install package \"{package}\" failed: {source}")]
    PackageInstallFailed {
        package: String,
        #[source]
        source: ExecutionError,
    },

    #[error("Uninstall package \"{package}\" failed: {source}")]
    PackageRemovalFailed {
        package: String,
        #[source]
        source: ExecutionError,
    },

    #[error("Service {action} failed for {service}: {source}")]
    ServiceActionFailed {
        service: String,
        action: String,
        #[source]
        source: ExecutionError,
    },

    #[error("Environment variable {name} is not set")]
    MissingEnvironment { name: String },

    #[error("Unknown user: {name}")]
    UnknownUser { name: String },

    #[error("Cannot determine {fact}")]
    FactUnavailable { fact: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(unix)]
impl From<nix::Error> for ModuleError {
    fn from(err: nix::Error) -> Self {
        ModuleError::Io(std::io::Error::from(err))
    }
}
