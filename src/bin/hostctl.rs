use clap::Parser;
use hostctl::cli::{execute_cli, exit_code_for, HostctlCli};
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    let cli = HostctlCli::parse();

    // Initialize tracing
    let level = match cli.verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    debug!("Starting hostctl v{}", env!("CARGO_PKG_VERSION"));

    let code = match execute_cli(&cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            exit_code_for(&e)
        }
    };

    std::process::exit(code);
}
