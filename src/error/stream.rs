//! Streaming-related error types.
//!
//! Errors for the answer stream as a whole. Individual malformed records
//! never become a `StreamError`; they are dropped by the parser.

use std::fmt;

/// Shown when the answer stream could not be opened or ended abnormally.
pub const STREAM_FAILURE_MESSAGE: &str = "Failed to process questions. Please try again.";

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// The stream could not be opened or ended abnormally.
    ConnectionLost { message: String },

    /// A payload that had to be JSON was not.
    InvalidJson { message: String },

    /// The backend reported a stream-scoped error event.
    BackendError { message: String },
}

impl StreamError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StreamError::ConnectionLost { .. })
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::ConnectionLost { .. } => STREAM_FAILURE_MESSAGE.to_string(),
            StreamError::InvalidJson { .. } => {
                "Received invalid data from server. Please try again.".to_string()
            }
            StreamError::BackendError { message } => message.clone(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::ConnectionLost { .. } => "E_STREAM_LOST",
            StreamError::InvalidJson { .. } => "E_STREAM_JSON",
            StreamError::BackendError { .. } => "E_STREAM_BACKEND",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::ConnectionLost { message } => write!(f, "Stream connection lost: {}", message),
            StreamError::InvalidJson { message } => write!(f, "Invalid JSON in stream: {}", message),
            StreamError::BackendError { message } => write!(f, "Backend error: {}", message),
        }
    }
}

impl std::error::Error for StreamError {}
