//! Unified error type for multiq.

use std::fmt;

use super::category::ErrorCategory;
use super::network::NetworkError;
use super::stream::StreamError;
use crate::traits::HttpError;

/// Unified error type returned by the API client and the CLI.
#[derive(Debug)]
pub enum MultiqError {
    /// Request/response collaborator failures.
    Network(NetworkError),

    /// Answer stream failures.
    Stream(StreamError),

    /// Rejected user input, e.g. an empty question list.
    Input { message: String },

    /// Invalid configuration.
    Config { message: String },

    /// Local I/O, e.g. reading questions from stdin.
    Io(std::io::Error),
}

impl MultiqError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            MultiqError::Network(NetworkError::HttpStatus { .. }) => ErrorCategory::Server,
            MultiqError::Network(NetworkError::InvalidResponse { .. }) => ErrorCategory::Client,
            MultiqError::Network(_) => ErrorCategory::Network,
            MultiqError::Stream(StreamError::ConnectionLost { .. }) => ErrorCategory::Network,
            MultiqError::Stream(StreamError::InvalidJson { .. }) => ErrorCategory::Client,
            MultiqError::Stream(_) => ErrorCategory::Server,
            MultiqError::Input { .. } => ErrorCategory::User,
            MultiqError::Config { .. } => ErrorCategory::Configuration,
            MultiqError::Io(_) => ErrorCategory::Client,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            MultiqError::Network(err) => err.is_retryable(),
            MultiqError::Stream(err) => err.is_retryable(),
            MultiqError::Input { .. } | MultiqError::Config { .. } | MultiqError::Io(_) => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            MultiqError::Network(err) => err.user_message(),
            MultiqError::Stream(err) => err.user_message(),
            MultiqError::Input { message } => message.clone(),
            MultiqError::Config { message } => format!("Configuration error: {}", message),
            MultiqError::Io(err) => format!("I/O error: {}", err),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            MultiqError::Network(err) => err.error_code(),
            MultiqError::Stream(err) => err.error_code(),
            MultiqError::Input { .. } => "E_INPUT",
            MultiqError::Config { .. } => "E_CONFIG",
            MultiqError::Io(_) => "E_IO",
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        MultiqError::Input { message: message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        MultiqError::Config { message: message.into() }
    }
}

impl fmt::Display for MultiqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MultiqError::Network(err) => write!(f, "{}", err),
            MultiqError::Stream(err) => write!(f, "{}", err),
            MultiqError::Input { message } => write!(f, "Invalid input: {}", message),
            MultiqError::Config { message } => write!(f, "Invalid configuration: {}", message),
            MultiqError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for MultiqError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MultiqError::Network(err) => Some(err),
            MultiqError::Stream(err) => Some(err),
            MultiqError::Io(err) => Some(err),
            MultiqError::Input { .. } | MultiqError::Config { .. } => None,
        }
    }
}

impl From<NetworkError> for MultiqError {
    fn from(err: NetworkError) -> Self {
        MultiqError::Network(err)
    }
}

impl From<StreamError> for MultiqError {
    fn from(err: StreamError) -> Self {
        MultiqError::Stream(err)
    }
}

/// Without a URL to attach; prefer [`NetworkError::from_http`] when one is known.
impl From<HttpError> for MultiqError {
    fn from(err: HttpError) -> Self {
        MultiqError::Network(NetworkError::from_http(err, "backend"))
    }
}

impl From<std::io::Error> for MultiqError {
    fn from(err: std::io::Error) -> Self {
        MultiqError::Io(err)
    }
}

impl From<serde_json::Error> for MultiqError {
    fn from(err: serde_json::Error) -> Self {
        MultiqError::Stream(StreamError::InvalidJson {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let server: MultiqError = NetworkError::HttpStatus { status: 500, message: String::new() }.into();
        assert_eq!(server.category(), ErrorCategory::Server);
        assert!(server.is_retryable());

        let conn: MultiqError = NetworkError::ConnectionFailed {
            url: "u".to_string(),
            message: "m".to_string(),
        }
        .into();
        assert_eq!(conn.category(), ErrorCategory::Network);

        let input = MultiqError::input("Please enter at least one question");
        assert_eq!(input.category(), ErrorCategory::User);
        assert!(!input.is_retryable());
        assert_eq!(input.user_message(), "Please enter at least one question");

        let config = MultiqError::config("bad timeout");
        assert_eq!(config.category(), ErrorCategory::Configuration);
        assert_eq!(config.error_code(), "E_CONFIG");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: MultiqError = json_err.into();
        assert!(matches!(err, MultiqError::Stream(StreamError::InvalidJson { .. })));
        assert_eq!(err.category(), ErrorCategory::Client);
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;
        let err: MultiqError = NetworkError::Cancelled.into();
        assert!(err.source().is_some());
        assert!(MultiqError::config("x").source().is_none());
    }

    #[test]
    fn test_http_and_io_conversion() {
        let err: MultiqError = HttpError::ConnectionFailed("refused".to_string()).into();
        assert_eq!(err.user_message(), "Error connecting to server.");

        let err: MultiqError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into();
        assert_eq!(err.error_code(), "E_IO");
        assert!(!err.is_retryable());
    }
}
