//! Service control through `service`, state queries through `systemctl`

use crate::execution::{CommandEngine, CommandInvocation, FailPolicy};
use crate::modules::{
    error::ModuleError,
    system::service_managers::{ServiceManager, ServiceResult},
};
use async_trait::async_trait;

pub struct SystemServiceManager<'a> {
    engine: &'a CommandEngine,
    quiet: bool,
}

impl<'a> SystemServiceManager<'a> {
    pub fn new(engine: &'a CommandEngine) -> Self {
        Self {
            engine,
            quiet: false,
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    async fn control(&self, name: &str, action: &str) -> Result<ServiceResult, ModuleError> {
        let invocation = CommandInvocation::new(["service", name, action])
            .elevated(true)
            .quiet(self.quiet);

        let result = self
            .engine
            .execute(&invocation)
            .await
            .map_err(|source| ModuleError::ServiceActionFailed {
                service: name.to_string(),
                action: action.to_string(),
                source,
            })?;
        Ok(result.into())
    }

    fn query(argv: &[&str]) -> CommandInvocation {
        CommandInvocation::new(argv.iter().copied())
            .quiet(true)
            .retries(1)
            .fail_policy(FailPolicy::ReturnResult)
    }
}

#[async_trait]
impl ServiceManager for SystemServiceManager<'_> {
    async fn is_active(&self, name: &str) -> Result<bool, ModuleError> {
        let result = self
            .engine
            .execute(&Self::query(&["systemctl", "is-active", name]))
            .await?;
        Ok(result.stdout_text.trim() == "active")
    }

    async fn exists(&self, name: &str) -> Result<bool, ModuleError> {
        let result = self
            .engine
            .execute(&Self::query(&["systemctl", "list-units", "--full", "-all"]))
            .await?;

        match count_unit_matches(&result.stdout_text, name) {
            0 => Ok(false),
            1 => Ok(true),
            matches => Err(ModuleError::AmbiguousQueryResult {
                subject: format!("service {name}"),
                matches,
            }),
        }
    }

    async fn start(&self, name: &str) -> Result<ServiceResult, ModuleError> {
        self.control(name, "start").await
    }

    async fn stop(&self, name: &str) -> Result<ServiceResult, ModuleError> {
        self.control(name, "stop").await
    }

    async fn restart(&self, name: &str) -> Result<ServiceResult, ModuleError> {
        self.control(name, "restart").await
    }
}

/// Number of `systemctl list-units` lines naming `<name>.service` as a unit.
pub fn count_unit_matches(listing: &str, name: &str) -> usize {
    let unit = format!("{name}.service");
    listing
        .lines()
        .filter(|line| line.split_whitespace().any(|token| token == unit))
        .count()
}
