use crate::execution::error::ExecutionError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine-wide defaults read by every invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Program prepended to argv when elevation is requested
    pub elevation_command: String,
    /// Attempts per invocation when the invocation does not set its own limit
    pub default_retry_limit: u32,
    pub package_manager: String,
    pub package_query: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            elevation_command: "sudo".to_string(),
            default_retry_limit: 3,
            package_manager: "apt-get".to_string(),
            package_query: "dpkg".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ExecutionError> {
        let config: EngineConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ExecutionError> {
        let content = std::fs::read_to_string(path).map_err(|e| ExecutionError::Config {
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_yaml(&content)
    }

    pub fn with_elevation_command(mut self, command: impl Into<String>) -> Self {
        self.elevation_command = command.into();
        self
    }

    pub fn with_retry_limit(mut self, retries: u32) -> Self {
        self.default_retry_limit = retries;
        self
    }

    pub fn with_package_manager(mut self, command: impl Into<String>) -> Self {
        self.package_manager = command.into();
        self
    }

    fn validate(&self) -> Result<(), ExecutionError> {
        if self.elevation_command.trim().is_empty() {
            return Err(ExecutionError::Config {
                reason: "elevation_command must not be empty".to_string(),
            });
        }
        if self.package_manager.trim().is_empty() {
            return Err(ExecutionError::Config {
                reason: "package_manager must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
