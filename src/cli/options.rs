use crate::execution::{EngineConfig, ExecutionError, FailPolicy};
use crate::modules::InstallOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Retryable command, package and service operations for Debian/Ubuntu hosts
#[derive(Parser, Debug)]
#[command(name = "hostctl")]
#[command(about = "Retryable command, package and service operations for Debian/Ubuntu hosts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct HostctlCli {
    #[command(subcommand)]
    pub command: Commands,

    /// YAML file with engine settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Command used for privilege elevation (default: sudo)
    #[arg(long, global = true)]
    pub elevation_command: Option<String>,

    /// Attempts per command before giving up (default: 3)
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    /// Package manager binary (default: apt-get)
    #[arg(long, global = true)]
    pub package_manager: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Do not echo child output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a command with retries
    Run {
        /// Program and arguments; a single argument is split shell-style
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
        /// Run the command line through `sh -c`
        #[arg(long)]
        shell: bool,
        /// Prefix the elevation command
        #[arg(long)]
        elevate: bool,
        /// Report a non-zero exit code instead of failing
        #[arg(long)]
        no_fail: bool,
    },

    /// Show how the shell resolves a command name
    Resolve { name: String },

    /// Install packages
    Install {
        #[arg(required = true)]
        packages: Vec<String>,
        #[arg(long)]
        reinstall: bool,
        #[command(flatten)]
        package_args: PackageArgs,
    },

    /// Purge packages
    Uninstall {
        #[arg(required = true)]
        packages: Vec<String>,
        #[command(flatten)]
        package_args: PackageArgs,
    },

    /// Check whether a package is installed
    IsInstalled { package: String },

    /// Start a service
    ServiceStart { name: String },

    /// Stop a service
    ServiceStop { name: String },

    /// Restart a service
    ServiceRestart { name: String },

    /// Check whether a service is active
    ServiceActive { name: String },

    /// Check whether a service unit exists
    ServiceExists { name: String },

    /// Print the release codename
    ReleaseName,

    /// Print the release number
    ReleaseNumber,

    /// Print a user's home directory (current user by default)
    HomeDir { user: Option<String> },

    /// Print the current user name
    Username,

    /// Print the DISPLAY variable
    Display,

    /// Wait until a file exists
    WaitCreated {
        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Wait until a file stops changing
    WaitUnchanged {
        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Re-run this program with the same arguments
    Restart {
        /// Go through the elevation command
        #[arg(long)]
        privileged: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct PackageArgs {
    /// Do not prefix the elevation command
    #[arg(long)]
    pub no_elevate: bool,
    /// Report a non-zero exit code instead of failing
    #[arg(long)]
    pub no_fail: bool,
    /// Extra argument passed to the package manager (repeatable)
    #[arg(long = "extra", allow_hyphen_values = true)]
    pub extra_parameters: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct WaitArgs {
    pub path: PathBuf,
    /// Overall deadline in seconds
    #[arg(long, default_value = "60")]
    pub max_wait: u64,
    /// Seconds between checks
    #[arg(long, default_value = "1")]
    pub check_interval: u64,
}

impl HostctlCli {
    /// Config file (if any) with command line overrides applied
    pub fn engine_config(&self) -> Result<EngineConfig, ExecutionError> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };
        if let Some(command) = &self.elevation_command {
            config = config.with_elevation_command(command.clone());
        }
        if let Some(retries) = self.retries {
            config = config.with_retry_limit(retries);
        }
        if let Some(manager) = &self.package_manager {
            config = config.with_package_manager(manager.clone());
        }
        Ok(config)
    }
}

impl PackageArgs {
    pub fn install_options(&self, quiet: bool, reinstall: bool) -> InstallOptions {
        InstallOptions {
            quiet,
            reinstall,
            use_elevation: !self.no_elevate,
            fail_policy: fail_policy(self.no_fail),
            extra_parameters: self.extra_parameters.clone(),
        }
    }
}

pub fn fail_policy(no_fail: bool) -> FailPolicy {
    if no_fail {
        FailPolicy::ReturnResult
    } else {
        FailPolicy::RaiseOnNonZero
    }
}
