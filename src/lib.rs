//! hostctl - host automation helpers for Debian/Ubuntu machines
//!
//! The [`execution`] engine runs external commands with optional privilege
//! elevation, sequential retries and a caller-chosen failure policy. The
//! [`modules`] build package, service, host and file operations on top of it.

pub mod cli;
pub mod execution;
pub mod modules;

pub use execution::{
    CommandEngine, CommandInvocation, EngineConfig, ExecutionError, ExecutionResult, FailPolicy,
};
pub use modules::ModuleError;
