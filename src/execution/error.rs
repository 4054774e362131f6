use thiserror::Error;

/// Errors raised by the command execution engine
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Command not found: {name}")]
    CommandNotFound { name: String },

    #[error("Elevation command not available: {command}")]
    ElevationUnavailable { command: String },

    #[error("Command \"{command}\" failed with exit code {exit_code}")]
    CommandFailed { command: String, exit_code: i32 },

    #[error("Unsupported platform: {operation}")]
    UnsupportedPlatform { operation: String },

    #[error("Empty command")]
    EmptyCommand,

    #[error("Failed to spawn \"{command}\": {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to restart current process: {reason}")]
    RestartFailed { reason: String },

    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for ExecutionError {
    fn from(err: serde_yaml::Error) -> Self {
        ExecutionError::Config {
            reason: err.to_string(),
        }
    }
}

#[cfg(unix)]
impl From<nix::Error> for ExecutionError {
    fn from(err: nix::Error) -> Self {
        ExecutionError::RestartFailed {
            reason: err.to_string(),
        }
    }
}
