//! Service manager implementations

use crate::execution::ExecutionResult;
use crate::modules::error::ModuleError;
use async_trait::async_trait;
use serde::Serialize;

#[async_trait]
pub trait ServiceManager: Send + Sync {
    async fn is_active(&self, name: &str) -> Result<bool, ModuleError>;
    async fn exists(&self, name: &str) -> Result<bool, ModuleError>;
    async fn start(&self, name: &str) -> Result<ServiceResult, ModuleError>;
    async fn stop(&self, name: &str) -> Result<ServiceResult, ModuleError>;
    async fn restart(&self, name: &str) -> Result<ServiceResult, ModuleError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl From<ExecutionResult> for ServiceResult {
    fn from(result: ExecutionResult) -> Self {
        Self {
            success: result.success(),
            exit_code: result.exit_code,
            stdout: result.stdout_text,
            stderr: result.stderr_text,
        }
    }
}

pub mod systemd;

pub use systemd::{count_unit_matches, SystemServiceManager};
