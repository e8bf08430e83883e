//! Command-line interface for multiq.
//!
//! - Argument parsing
//! - Version and usage text
//! - The ask/summarize/chat flow
//!
//! # Usage
//!
//! ```ignore
//! use multiq::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args())?;
//! let ok = runtime.block_on(run_cli_command(command, &config))?;
//! ```

pub mod args;
pub mod run;
pub mod version;

pub use args::{parse_args, ArgsError, AskOptions, CliCommand};
pub use run::{run_ask, summarize_all, StreamPrinter, EXIT_COMMAND};
pub use version::{version_line, USAGE, VERSION};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::MultiqResult;

/// Run a parsed command against the backend in `config`.
///
/// Returns whether the command succeeded. Failures that were already
/// reported to the user come back as `Ok(false)`.
pub async fn run_cli_command(command: CliCommand, config: &ClientConfig) -> MultiqResult<bool> {
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            Ok(true)
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(true)
        }
        CliCommand::Ask(options) => {
            let api = ApiClient::from_config(config)?;
            run_ask(&api, config, options).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_version_and_help_succeed() {
        let config = ClientConfig::default();
        assert!(run_cli_command(CliCommand::Version, &config).await.unwrap());
        assert!(run_cli_command(CliCommand::Help, &config).await.unwrap());
    }
}
