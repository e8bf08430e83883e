//! Client configuration.
//!
//! Builder-style settings for the backend connection, loadable from the
//! environment.

use std::time::Duration;

use crate::error::{MultiqError, MultiqResult};
use crate::questions::MAX_CHARS;

/// Backend used when `MULTIQ_BACKEND_URL` is unset.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Timeout for buffered (non-streaming) requests, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const BACKEND_URL_ENV: &str = "MULTIQ_BACKEND_URL";
pub const TIMEOUT_ENV: &str = "MULTIQ_TIMEOUT_SECS";

/// Configuration for the API client.
///
/// ```ignore
/// use multiq::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_backend_url("http://localhost:8080")
///     .with_request_timeout(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the question-answering backend, without trailing slash
    pub backend_url: String,
    /// Applies to chat and summary requests, not to the answer stream
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Upper bound on the question input, in characters
    pub max_chars: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            max_chars: MAX_CHARS,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend URL. A trailing slash is dropped.
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Read `MULTIQ_BACKEND_URL` and `MULTIQ_TIMEOUT_SECS`.
    ///
    /// Unset variables keep their defaults; a timeout that is not a positive
    /// integer is a configuration error.
    pub fn from_env() -> MultiqResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            let url = url.trim();
            if url.is_empty() {
                return Err(MultiqError::config(format!("{} is empty", BACKEND_URL_ENV)));
            }
            config = config.with_backend_url(url);
        }

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            let secs: u64 = raw
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    MultiqError::config(format!("{} must be a positive integer, got '{}'", TIMEOUT_ENV, raw))
                })?;
            config = config.with_request_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}
