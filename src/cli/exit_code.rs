//! Process exit codes for failures surfaced at the command line

use crate::execution::ExecutionError;
use crate::modules::ModuleError;
use std::io::ErrorKind;

#[cfg(unix)]
mod errno {
    pub const EPERM: i32 = libc::EPERM;
    pub const ENOENT: i32 = libc::ENOENT;
    pub const EEXIST: i32 = libc::EEXIST;
    pub const EINVAL: i32 = libc::EINVAL;
    pub const ENOSYS: i32 = libc::ENOSYS;
    pub const ETIMEDOUT: i32 = libc::ETIMEDOUT;
}

#[cfg(not(unix))]
mod errno {
    pub const EPERM: i32 = 1;
    pub const ENOENT: i32 = 2;
    pub const EEXIST: i32 = 17;
    pub const EINVAL: i32 = 22;
    pub const ENOSYS: i32 = 38;
    pub const ETIMEDOUT: i32 = 110;
}

const GENERIC_FAILURE: i32 = 1;

/// Exit code for an error coming out of the CLI. Failed commands pass their
/// own exit code through; everything else maps to a POSIX errno.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<ModuleError>() {
        return module_exit_code(err);
    }
    if let Some(err) = err.downcast_ref::<ExecutionError>() {
        return execution_exit_code(err);
    }
    if let Some(err) = err.downcast_ref::<std::io::Error>() {
        return io_exit_code(err);
    }
    GENERIC_FAILURE
}

pub fn module_exit_code(err: &ModuleError) -> i32 {
    match err {
        ModuleError::Execution(source)
        | ModuleError::PackageInstallFailed { source, .. }
        | ModuleError::PackageRemovalFailed { source, .. }
        | ModuleError::ServiceActionFailed { source, .. } => execution_exit_code(source),
        ModuleError::AmbiguousQueryResult { .. } => errno::EINVAL,
        ModuleError::Timeout { .. } => errno::ETIMEDOUT,
        ModuleError::MissingEnvironment { .. }
        | ModuleError::UnknownUser { .. }
        | ModuleError::FactUnavailable { .. } => errno::ENOENT,
        ModuleError::Io(err) => io_exit_code(err),
    }
}

pub fn execution_exit_code(err: &ExecutionError) -> i32 {
    match err {
        ExecutionError::CommandFailed { exit_code, .. } if *exit_code > 0 => *exit_code,
        ExecutionError::CommandFailed { .. } => GENERIC_FAILURE,
        ExecutionError::CommandNotFound { .. } => errno::ENOENT,
        ExecutionError::ElevationUnavailable { .. } => errno::EPERM,
        ExecutionError::UnsupportedPlatform { .. } => errno::ENOSYS,
        ExecutionError::EmptyCommand | ExecutionError::Config { .. } => errno::EINVAL,
        ExecutionError::Spawn { source, .. } => io_exit_code(source),
        ExecutionError::RestartFailed { .. } => GENERIC_FAILURE,
        ExecutionError::Io(err) => io_exit_code(err),
    }
}

fn io_exit_code(err: &std::io::Error) -> i32 {
    match err.kind() {
        ErrorKind::NotFound => errno::ENOENT,
        ErrorKind::AlreadyExists => errno::EEXIST,
        ErrorKind::InvalidInput | ErrorKind::InvalidData => errno::EINVAL,
        ErrorKind::PermissionDenied => errno::EPERM,
        _ => err.raw_os_error().unwrap_or(GENERIC_FAILURE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_command_failure_passes_exit_code_through() {
        let err = anyhow::Error::new(ExecutionError::CommandFailed {
            command: "false".to_string(),
            exit_code: 100,
        });
        assert_eq!(exit_code_for(&err), 100);
    }

    #[test]
    fn test_signal_killed_command_is_generic_failure() {
        let err = ExecutionError::CommandFailed {
            command: "sleep 10".to_string(),
            exit_code: -1,
        };
        assert_eq!(execution_exit_code(&err), GENERIC_FAILURE);
    }

    #[test]
    fn test_nested_package_failure() {
        let err = anyhow::Error::new(ModuleError::PackageInstallFailed {
            package: "unknown".to_string(),
            source: ExecutionError::CommandFailed {
                command: "apt-get install unknown -y".to_string(),
                exit_code: 100,
            },
        });
        assert_eq!(exit_code_for(&err), 100);
    }

    #[test]
    fn test_errno_categories() {
        let not_found = anyhow::Error::new(ExecutionError::CommandNotFound {
            name: "nope".to_string(),
        });
        assert_eq!(exit_code_for(&not_found), errno::ENOENT);

        let exists = anyhow::Error::new(std::io::Error::from(ErrorKind::AlreadyExists));
        assert_eq!(exit_code_for(&exists), errno::EEXIST);

        let ambiguous = anyhow::Error::new(ModuleError::AmbiguousQueryResult {
            subject: "package libc6".to_string(),
            matches: 2,
        });
        assert_eq!(exit_code_for(&ambiguous), errno::EINVAL);

        let timeout = anyhow::Error::new(ModuleError::Timeout {
            path: PathBuf::from("/tmp/x"),
            waited: Duration::from_secs(1),
        });
        assert_eq!(exit_code_for(&timeout), errno::ETIMEDOUT);
    }
}
