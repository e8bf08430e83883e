//! Command-line argument parsing.

use thiserror::Error;

/// Options for a question run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AskOptions {
    /// Questions given as arguments; empty means read them from stdin
    pub questions: Vec<String>,
    /// Fetch a short answer for every finished answer
    pub summarize: bool,
    /// 1-based answer number to open a follow-up chat about
    pub chat: Option<usize>,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Ask questions (default)
    Ask(AskOptions),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("{0} requires a value")]
    MissingValue(&'static str),
    #[error("invalid answer number '{0}': expected 1 or more")]
    InvalidAnswerNumber(String),
    #[error("unknown option '{0}'")]
    UnknownOption(String),
}

/// Parse command-line arguments, program name first.
///
/// # Examples
///
/// ```
/// use multiq::cli::args::{parse_args, AskOptions, CliCommand};
///
/// let args = vec!["multiq".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
///
/// let args = vec!["multiq".to_string(), "What is Rust?".to_string()];
/// assert_eq!(
///     parse_args(args.into_iter()),
///     Ok(CliCommand::Ask(AskOptions {
///         questions: vec!["What is Rust?".to_string()],
///         ..AskOptions::default()
///     }))
/// );
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut options = AskOptions::default();
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--summarize" => options.summarize = true,
            "--chat" => {
                let value = args.next().ok_or(ArgsError::MissingValue("--chat"))?;
                let number = value
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or(ArgsError::InvalidAnswerNumber(value))?;
                options.chat = Some(number);
            }
            "--" => {
                options.questions.extend(args.by_ref());
            }
            flag if flag.starts_with("--") => return Err(ArgsError::UnknownOption(flag.to_string())),
            _ => options.questions.push(arg),
        }
    }

    Ok(CliCommand::Ask(options))
}
