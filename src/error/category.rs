//! Error category classification.
//!
//! Categories give callers one place to decide whether a failure is worth
//! retrying and how to talk about it to the user.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS or timeout failures. Generally transient.
    Network,

    /// The backend answered with a failure (HTTP 5xx, `success: false`).
    Server,

    /// Client-side defects such as undecodable payloads.
    Client,

    /// The user has to change their input before retrying.
    User,

    /// Missing or invalid configuration.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Short label suitable for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// A hint shown next to the error message.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check that the backend is reachable and try again.",
            ErrorCategory::Server => "The backend reported a problem. Try again shortly.",
            ErrorCategory::Client => "This looks like a client bug. Please report it.",
            ErrorCategory::User => "Adjust your input and try again.",
            ErrorCategory::Configuration => "Check the MULTIQ_* environment variables.",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
