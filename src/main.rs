use multiq::cli::{parse_args, run_cli_command, CliCommand, USAGE};
use multiq::config::ClientConfig;
use multiq::error::ErrorCategory;

use color_eyre::Result;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "multiq=info";

/// Logs go to stderr so stdout carries only answers.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("multiq: {}\n\n{}", err, USAGE);
            std::process::exit(2);
        }
    };

    // Version and help never touch the backend
    if matches!(command, CliCommand::Version | CliCommand::Help) {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(run_cli_command(command, &ClientConfig::default()))?;
        return Ok(());
    }

    init_tracing();
    let config = ClientConfig::from_env()?;
    tracing::debug!(backend = %config.backend_url, "Configuration loaded");

    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(run_cli_command(command, &config)) {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(err) if err.category() == ErrorCategory::User => {
            eprintln!("{}", err.user_message());
            std::process::exit(1);
        }
        Err(err) => {
            tracing::error!(code = err.error_code(), category = %err.category(), "{}", err);
            eprintln!("{}", err.category().recovery_hint());
            Err(err.into())
        }
    }
}
