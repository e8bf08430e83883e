//! Network-related error types.
//!
//! Failures of the request/response collaborators: the backend could not be
//! reached, answered with a non-2xx status, or returned a body we could not
//! read.

use std::fmt;

use crate::traits::HttpError;

/// Network-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Connection to the backend failed.
    ConnectionFailed { url: String, message: String },

    /// Request timed out.
    Timeout { operation: String },

    /// Non-2xx HTTP response.
    HttpStatus { status: u16, message: String },

    /// The response body did not have the expected shape.
    InvalidResponse { message: String },

    /// The request was cancelled before it completed.
    Cancelled,

    /// Anything else reported by the transport.
    Other { message: String },
}

impl NetworkError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { .. } => true,
            NetworkError::Timeout { .. } => true,
            NetworkError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            NetworkError::InvalidResponse { .. } => false,
            NetworkError::Cancelled => false,
            NetworkError::Other { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { .. } => "Error connecting to server.".to_string(),
            NetworkError::Timeout { operation } => {
                format!("The {} request timed out. The server may be slow or unreachable.", operation)
            }
            NetworkError::HttpStatus { status, .. } => match *status {
                400 => "The request was invalid. Please try again.".to_string(),
                404 => "The backend endpoint was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => "The server is experiencing issues. Please try again later.".to_string(),
                _ => format!("The server returned an error (HTTP {}). Please try again.", status),
            },
            NetworkError::InvalidResponse { .. } => {
                "Received an invalid response from the server. Please try again.".to_string()
            }
            NetworkError::Cancelled => "The request was cancelled.".to_string(),
            NetworkError::Other { message } => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::HttpStatus { .. } => "E_NET_HTTP",
            NetworkError::InvalidResponse { .. } => "E_NET_INVALID",
            NetworkError::Cancelled => "E_NET_CANCEL",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }

    /// Classify a transport error raised while talking to `url`.
    pub fn from_http(err: HttpError, url: &str) -> Self {
        match err {
            HttpError::ConnectionFailed(message) => NetworkError::ConnectionFailed {
                url: url.to_string(),
                message,
            },
            HttpError::Timeout(_) => NetworkError::Timeout {
                operation: url.to_string(),
            },
            HttpError::ServerError { status, message } => NetworkError::HttpStatus { status, message },
            HttpError::Cancelled => NetworkError::Cancelled,
            HttpError::InvalidUrl(message) => NetworkError::ConnectionFailed {
                url: url.to_string(),
                message,
            },
            HttpError::Io(message) | HttpError::Other(message) => NetworkError::Other { message },
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed { url, message } => {
                write!(f, "Connection failed to '{}': {}", url, message)
            }
            NetworkError::Timeout { operation } => write!(f, "{} timed out", operation),
            NetworkError::HttpStatus { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            NetworkError::InvalidResponse { message } => write!(f, "Invalid response: {}", message),
            NetworkError::Cancelled => write!(f, "Request cancelled"),
            NetworkError::Other { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for NetworkError {}
