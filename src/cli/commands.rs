use crate::cli::options::{fail_policy, Commands, HostctlCli, WaitArgs};
use crate::cli::output::Printer;
use crate::execution::{CommandEngine, CommandInvocation};
use crate::modules::{
    batch_exit_code, host, wait_for_file_to_be_created, wait_for_file_to_be_unchanged,
    AptPackageManager, PackageManager, ServiceManager, SystemServiceManager,
};
use anyhow::Context;
use std::time::Duration;
use tracing::info;

/// Runs the selected subcommand and returns the process exit code.
pub async fn execute_cli(cli: &HostctlCli) -> anyhow::Result<i32> {
    let config = cli.engine_config()?;
    let engine = CommandEngine::new(config);
    let printer = Printer::new(cli.json);
    // Live child output would interleave with the JSON document on stdout
    let quiet = cli.quiet || cli.json;

    match &cli.command {
        Commands::Run {
            command,
            shell,
            elevate,
            no_fail,
        } => {
            let invocation = build_run_invocation(command, *shell)?
                .elevated(*elevate)
                .quiet(quiet)
                .fail_policy(fail_policy(*no_fail));
            let result = engine.execute(&invocation).await?;
            printer.execution(&result, quiet)?;
            Ok(result.exit_code)
        }

        Commands::Resolve { name } => {
            let resolved = engine.resolve_command(name).await?;
            printer.resolved(&resolved)?;
            Ok(0)
        }

        Commands::Install {
            packages,
            reinstall,
            package_args,
        } => {
            let options = package_args.install_options(quiet, *reinstall);
            let results = AptPackageManager::new(&engine)
                .install_each(packages, &options)
                .await?;
            printer.packages(&results)?;
            Ok(batch_exit_code(&results))
        }

        Commands::Uninstall {
            packages,
            package_args,
        } => {
            let options = package_args.install_options(quiet, false);
            let results = AptPackageManager::new(&engine)
                .uninstall_each(packages, &options)
                .await?;
            printer.packages(&results)?;
            Ok(batch_exit_code(&results))
        }

        Commands::IsInstalled { package } => {
            let installed = AptPackageManager::new(&engine).is_installed(package).await?;
            printer.flag(installed)?;
            Ok(0)
        }

        Commands::ServiceStart { name } => {
            let manager = SystemServiceManager::new(&engine).quiet(quiet);
            let result = manager.start(name).await?;
            printer.service(name, &result)?;
            Ok(result.exit_code)
        }

        Commands::ServiceStop { name } => {
            let manager = SystemServiceManager::new(&engine).quiet(quiet);
            let result = manager.stop(name).await?;
            printer.service(name, &result)?;
            Ok(result.exit_code)
        }

        Commands::ServiceRestart { name } => {
            let manager = SystemServiceManager::new(&engine).quiet(quiet);
            let result = manager.restart(name).await?;
            printer.service(name, &result)?;
            Ok(result.exit_code)
        }

        Commands::ServiceActive { name } => {
            let active = SystemServiceManager::new(&engine).is_active(name).await?;
            printer.flag(active)?;
            Ok(0)
        }

        Commands::ServiceExists { name } => {
            let exists = SystemServiceManager::new(&engine).exists(name).await?;
            printer.flag(exists)?;
            Ok(0)
        }

        Commands::ReleaseName => {
            printer.text(&host::linux_release_name(&engine).await?)?;
            Ok(0)
        }

        Commands::ReleaseNumber => {
            printer.text(&host::linux_release_number(&engine).await?)?;
            Ok(0)
        }

        Commands::HomeDir { user } => {
            let home = match user {
                Some(user) => host::home_dir_of(user)?,
                None => host::home_dir_current_user()?,
            };
            printer.text(&home.to_string_lossy())?;
            Ok(0)
        }

        Commands::Username => {
            printer.text(&host::current_username()?)?;
            Ok(0)
        }

        Commands::Display => {
            printer.text(&host::display()?)?;
            Ok(0)
        }

        Commands::WaitCreated { wait } => {
            let (max_wait, interval) = wait_durations(wait);
            wait_for_file_to_be_created(&wait.path, max_wait, interval).await?;
            info!("{} exists", wait.path.display());
            Ok(0)
        }

        Commands::WaitUnchanged { wait } => {
            let (max_wait, interval) = wait_durations(wait);
            wait_for_file_to_be_unchanged(&wait.path, max_wait, interval).await?;
            info!("{} is unchanged", wait.path.display());
            Ok(0)
        }

        Commands::Restart { privileged } => {
            match engine.restart_current_process(*privileged).await? {}
        }
    }
}

/// A lone argument is treated as a command line and split shell-style,
/// unless it is meant for `sh -c`.
pub fn build_run_invocation(command: &[String], shell: bool) -> anyhow::Result<CommandInvocation> {
    if shell {
        return Ok(CommandInvocation::shell(command.join(" ")));
    }
    match command {
        [line] => {
            let argv = shell_words::split(line)
                .with_context(|| format!("cannot parse command line: {line}"))?;
            Ok(CommandInvocation::new(argv))
        }
        argv => Ok(CommandInvocation::new(argv.iter().cloned())),
    }
}

fn wait_durations(wait: &WaitArgs) -> (Duration, Duration) {
    (
        Duration::from_secs(wait.max_wait),
        Duration::from_secs(wait.check_interval),
    )
}
