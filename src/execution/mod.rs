//! Command execution engine
//!
//! Turns a [`CommandInvocation`] into one or more sequential child process
//! runs with optional privilege elevation, output capture and a caller-chosen
//! failure policy.

pub mod capture;
pub mod config;
pub mod engine;
pub mod error;
pub mod invocation;
pub mod lookup;
pub mod restart;

pub use config::EngineConfig;
pub use engine::CommandEngine;
pub use error::ExecutionError;
pub use invocation::{CommandInvocation, ExecutionResult, FailPolicy};
pub use lookup::{CommandKind, CommandLookup, ResolvedCommand};
pub use restart::{default_relauncher, ProcessRelauncher, SpawnRelauncher};

#[cfg(unix)]
pub use restart::ExecRelauncher;
