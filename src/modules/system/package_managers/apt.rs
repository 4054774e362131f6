//! APT package manager for Debian/Ubuntu systems

use crate::execution::{CommandEngine, CommandInvocation, EngineConfig, FailPolicy};
use crate::modules::{
    error::ModuleError,
    system::package_managers::{InstallOptions, PackageManager, PackageResult},
};
use async_trait::async_trait;
use tracing::{debug, info};

pub struct AptPackageManager<'a> {
    engine: &'a CommandEngine,
}

impl<'a> AptPackageManager<'a> {
    pub fn new(engine: &'a CommandEngine) -> Self {
        Self { engine }
    }

    pub fn install_argv(
        config: &EngineConfig,
        package: &str,
        options: &InstallOptions,
    ) -> Vec<String> {
        let mut argv = vec![config.package_manager.clone(), "install".to_string()];
        if options.reinstall {
            argv.push("--reinstall".to_string());
        }
        argv.push(package.to_string());
        argv.push("-y".to_string());
        argv.extend(options.extra_parameters.iter().cloned());
        argv
    }

    pub fn uninstall_argv(
        config: &EngineConfig,
        package: &str,
        options: &InstallOptions,
    ) -> Vec<String> {
        let mut argv = vec![
            config.package_manager.clone(),
            "purge".to_string(),
            package.to_string(),
            "-y".to_string(),
        ];
        argv.extend(options.extra_parameters.iter().cloned());
        argv
    }

    fn invocation(argv: Vec<String>, options: &InstallOptions) -> CommandInvocation {
        CommandInvocation::new(argv)
            .elevated(options.use_elevation)
            .quiet(options.quiet)
            .fail_policy(options.fail_policy)
    }
}

#[async_trait]
impl PackageManager for AptPackageManager<'_> {
    async fn is_installed(&self, package: &str) -> Result<bool, ModuleError> {
        let query = CommandInvocation::new([
            self.engine.config().package_query.as_str(),
            "--list",
            package,
        ])
        .quiet(true)
        .retries(1)
        .fail_policy(FailPolicy::ReturnResult);

        // Unknown packages make dpkg exit non-zero with nothing on stdout
        let result = self.engine.execute(&query).await?;
        parse_installed_state(&result.stdout_text, package)
    }

    async fn install(
        &self,
        package: &str,
        options: &InstallOptions,
    ) -> Result<PackageResult, ModuleError> {
        if !options.reinstall && self.is_installed(package).await? {
            debug!("Package {} already installed", package);
            return Ok(PackageResult::unchanged(package));
        }

        let argv = Self::install_argv(self.engine.config(), package, options);
        let result = self
            .engine
            .execute(&Self::invocation(argv, options))
            .await
            .map_err(|source| ModuleError::PackageInstallFailed {
                package: package.to_string(),
                source,
            })?;

        if result.success() {
            info!("Package {} installed", package);
        }
        Ok(PackageResult::from_execution(package, result))
    }

    async fn uninstall(
        &self,
        package: &str,
        options: &InstallOptions,
    ) -> Result<PackageResult, ModuleError> {
        if !self.is_installed(package).await? {
            debug!("Package {} not installed", package);
            return Ok(PackageResult::unchanged(package));
        }

        let argv = Self::uninstall_argv(self.engine.config(), package, options);
        let result = self
            .engine
            .execute(&Self::invocation(argv, options))
            .await
            .map_err(|source| ModuleError::PackageRemovalFailed {
                package: package.to_string(),
                source,
            })?;

        if result.success() {
            info!("Package {} removed", package);
        }
        Ok(PackageResult::from_execution(package, result))
    }
}

/// Reads `dpkg --list` output. A package counts as installed when its single
/// listing line carries an `ii` status; more than one line is ambiguous.
pub fn parse_installed_state(listing: &str, package: &str) -> Result<bool, ModuleError> {
    let matches: Vec<&str> = listing
        .lines()
        .filter(|line| {
            line.split_whitespace().nth(1).is_some_and(|name| {
                name == package
                    || name
                        .strip_prefix(package)
                        .is_some_and(|rest| rest.starts_with(':'))
            })
        })
        .collect();

    match matches.as_slice() {
        [] => Ok(false),
        [line] => Ok(line.starts_with("ii")),
        _ => Err(ModuleError::AmbiguousQueryResult {
            subject: format!("package {package}"),
            matches: matches.len(),
        }),
    }
}
