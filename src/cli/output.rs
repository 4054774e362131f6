use crate::execution::{ExecutionResult, ResolvedCommand};
use crate::modules::{PackageResult, ServiceResult};
use serde::Serialize;

/// Prints either JSON or plain text for a CLI result
pub struct Printer {
    json: bool,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Child output was already echoed live unless quiet, so text mode only
    /// prints it when it would otherwise be lost.
    pub fn execution(&self, result: &ExecutionResult, quiet: bool) -> anyhow::Result<()> {
        if self.json {
            return self.json(result);
        }
        if quiet && !result.stdout_text.is_empty() {
            println!("{}", result.stdout_text);
        }
        Ok(())
    }

    pub fn resolved(&self, resolved: &ResolvedCommand) -> anyhow::Result<()> {
        if self.json {
            return self.json(resolved);
        }
        println!("{}\t{}", resolved.kind, resolved.path);
        Ok(())
    }

    pub fn packages(&self, results: &[PackageResult]) -> anyhow::Result<()> {
        if self.json {
            return self.json(&results);
        }
        for result in results {
            let state = match (result.changed, result.exit_code) {
                (_, code) if code != 0 => format!("failed ({code})"),
                (true, _) => "changed".to_string(),
                (false, _) => "ok".to_string(),
            };
            println!("{}: {}", result.package, state);
        }
        Ok(())
    }

    pub fn service(&self, name: &str, result: &ServiceResult) -> anyhow::Result<()> {
        if self.json {
            return self.json(result);
        }
        let state = if result.success { "ok" } else { "failed" };
        println!("{name}: {state}");
        Ok(())
    }

    pub fn flag(&self, value: bool) -> anyhow::Result<()> {
        if self.json {
            return self.json(&value);
        }
        println!("{value}");
        Ok(())
    }

    pub fn text(&self, value: &str) -> anyhow::Result<()> {
        if self.json {
            return self.json(&value);
        }
        println!("{value}");
        Ok(())
    }
}
