//! Re-launching the current program, optionally through the elevation command

use crate::execution::engine::CommandEngine;
use crate::execution::error::ExecutionError;
use crate::execution::lookup::CommandLookup;
use std::convert::Infallible;
use std::path::PathBuf;
use tracing::{info, warn};

/// Replaces (or, where that is impossible, supersedes) the running process
pub trait ProcessRelauncher: Send + Sync {
    /// Never returns on success.
    fn relaunch(&self, program: &str, argv: &[String]) -> Result<Infallible, ExecutionError>;

    /// Whether the relaunched image can be run through an elevation command
    fn supports_elevation(&self) -> bool;
}

/// In-place image replacement via `execv`
#[cfg(unix)]
pub struct ExecRelauncher;

#[cfg(unix)]
impl ProcessRelauncher for ExecRelauncher {
    fn relaunch(&self, program: &str, argv: &[String]) -> Result<Infallible, ExecutionError> {
        use std::ffi::CString;

        let to_cstring = |s: &str| {
            CString::new(s).map_err(|e| ExecutionError::RestartFailed {
                reason: format!("invalid argument {s:?}: {e}"),
            })
        };
        let path = to_cstring(program)?;
        let args = argv
            .iter()
            .map(|a| to_cstring(a))
            .collect::<Result<Vec<_>, _>>()?;

        mark_descriptors_close_on_exec();
        Ok(nix::unistd::execv(&path, &args)?)
    }

    fn supports_elevation(&self) -> bool {
        true
    }
}

/// Spawns a fresh copy, waits for it and exits with its status
pub struct SpawnRelauncher;

impl ProcessRelauncher for SpawnRelauncher {
    fn relaunch(&self, program: &str, argv: &[String]) -> Result<Infallible, ExecutionError> {
        let status = std::process::Command::new(program)
            .args(argv.iter().skip(1))
            .status()
            .map_err(|source| ExecutionError::Spawn {
                command: program.to_string(),
                source,
            })?;
        std::process::exit(status.code().unwrap_or(1))
    }

    fn supports_elevation(&self) -> bool {
        false
    }
}

pub fn default_relauncher() -> Box<dyn ProcessRelauncher> {
    #[cfg(unix)]
    {
        Box::new(ExecRelauncher)
    }
    #[cfg(not(unix))]
    {
        Box::new(SpawnRelauncher)
    }
}

/// Program path and argv for re-running `current_exe` with `args`.
pub async fn restart_command(
    engine: &CommandEngine,
    current_exe: PathBuf,
    args: Vec<String>,
    as_privileged: bool,
) -> Result<(String, Vec<String>), ExecutionError> {
    let exe = current_exe.to_string_lossy().into_owned();

    if !as_privileged {
        let mut argv = vec![exe.clone()];
        argv.extend(args);
        return Ok((exe, argv));
    }

    let elevation = &engine.config().elevation_command;
    match engine.lookup_command(elevation).await? {
        CommandLookup::Found(resolved) => {
            let mut argv = vec![elevation.clone(), exe];
            argv.extend(args);
            Ok((resolved.path, argv))
        }
        CommandLookup::NotFound => Err(ExecutionError::ElevationUnavailable {
            command: elevation.clone(),
        }),
    }
}

impl CommandEngine {
    /// Re-runs the current program with the same arguments. Does not return
    /// on success.
    pub async fn restart_current_process(
        &self,
        as_privileged: bool,
    ) -> Result<Infallible, ExecutionError> {
        self.restart_with(default_relauncher().as_ref(), as_privileged)
            .await
    }

    pub async fn restart_as_privileged(&self) -> Result<Infallible, ExecutionError> {
        self.restart_current_process(true).await
    }

    pub async fn restart_with(
        &self,
        relauncher: &dyn ProcessRelauncher,
        as_privileged: bool,
    ) -> Result<Infallible, ExecutionError> {
        if as_privileged && !relauncher.supports_elevation() {
            return Err(ExecutionError::UnsupportedPlatform {
                operation: "privileged process restart".to_string(),
            });
        }

        let current_exe = std::env::current_exe()?;
        let args: Vec<String> = std::env::args().skip(1).collect();
        let (program, argv) = restart_command(self, current_exe, args, as_privileged).await?;

        info!("Restarting as: {}", argv.join(" "));
        relauncher.relaunch(&program, &argv)
    }
}

/// Flags every descriptor above stderr `FD_CLOEXEC`, so a successful exec
/// drops them while a failed one leaves the process intact. Best effort.
#[cfg(unix)]
fn mark_descriptors_close_on_exec() {
    use nix::fcntl::{fcntl, FcntlArg, FdFlag};
    use std::os::fd::BorrowedFd;

    let entries = match std::fs::read_dir("/proc/self/fd") {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot enumerate open descriptors: {}", e);
            return;
        }
    };

    let fds: Vec<i32> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().to_str()?.parse().ok())
        .filter(|fd| *fd > 2)
        .collect();

    for raw in fds {
        // SAFETY: the borrow lives for these two fcntl calls only; a number
        // that is no longer open just yields EBADF.
        let fd = unsafe { BorrowedFd::borrow_raw(raw) };
        let flags = match fcntl(fd, FcntlArg::F_GETFD) {
            Ok(bits) => FdFlag::from_bits_truncate(bits),
            // The directory handle used above is gone by now
            Err(nix::errno::Errno::EBADF) => continue,
            Err(e) => {
                warn!("Cannot read flags of descriptor {}: {}", raw, e);
                continue;
            }
        };
        if let Err(e) = fcntl(fd, FcntlArg::F_SETFD(flags | FdFlag::FD_CLOEXEC)) {
            warn!("Failed to mark descriptor {} close-on-exec: {}", raw, e);
        }
    }
}
