//! Package manager implementations

use crate::execution::{ExecutionResult, FailPolicy};
use crate::modules::error::ModuleError;
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
    pub quiet: bool,
    pub reinstall: bool,
    pub use_elevation: bool,
    pub fail_policy: FailPolicy,
    /// Appended verbatim after `-y`
    pub extra_parameters: Vec<String>,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            quiet: false,
            reinstall: false,
            use_elevation: true,
            fail_policy: FailPolicy::RaiseOnNonZero,
            extra_parameters: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageResult {
    pub package: String,
    /// False when the package was already in the requested state
    pub changed: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl PackageResult {
    pub fn unchanged(package: &str) -> Self {
        Self {
            package: package.to_string(),
            changed: false,
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn from_execution(package: &str, result: ExecutionResult) -> Self {
        Self {
            package: package.to_string(),
            changed: result.success(),
            exit_code: result.exit_code,
            stdout: result.stdout_text,
            stderr: result.stderr_text,
        }
    }
}

/// Exit code summarising a batch: the last non-zero one, or 0.
pub fn batch_exit_code(results: &[PackageResult]) -> i32 {
    results
        .iter()
        .map(|result| result.exit_code)
        .filter(|code| *code != 0)
        .last()
        .unwrap_or(0)
}

#[async_trait]
pub trait PackageManager: Send + Sync {
    async fn is_installed(&self, package: &str) -> Result<bool, ModuleError>;

    async fn install(
        &self,
        package: &str,
        options: &InstallOptions,
    ) -> Result<PackageResult, ModuleError>;

    async fn uninstall(
        &self,
        package: &str,
        options: &InstallOptions,
    ) -> Result<PackageResult, ModuleError>;

    /// Installs each package in turn, stopping at the first error.
    async fn install_each(
        &self,
        packages: &[String],
        options: &InstallOptions,
    ) -> Result<Vec<PackageResult>, ModuleError> {
        let mut results = Vec::with_capacity(packages.len());
        for package in packages {
            results.push(self.install(package, options).await?);
        }
        Ok(results)
    }

    async fn uninstall_each(
        &self,
        packages: &[String],
        options: &InstallOptions,
    ) -> Result<Vec<PackageResult>, ModuleError> {
        let mut results = Vec::with_capacity(packages.len());
        for package in packages {
            results.push(self.uninstall(package, options).await?);
        }
        Ok(results)
    }

    /// Returns the last non-zero exit code, or 0.
    async fn install_many(
        &self,
        packages: &[String],
        options: &InstallOptions,
    ) -> Result<i32, ModuleError> {
        Ok(batch_exit_code(&self.install_each(packages, options).await?))
    }

    async fn uninstall_many(
        &self,
        packages: &[String],
        options: &InstallOptions,
    ) -> Result<i32, ModuleError> {
        Ok(batch_exit_code(&self.uninstall_each(packages, options).await?))
    }
}

pub mod apt;

pub use apt::{parse_installed_state, AptPackageManager};
