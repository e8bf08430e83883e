//! HTTP client trait abstraction.
//!
//! The answer stream and the follow-up requests all go through
//! [`HttpClient`], so the API client can run against reqwest in production
//! and against a recording mock in tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;
use thiserror::Error;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// A chunked response body, delivered in arrival order.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// HTTP response wrapper.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Body as lossy UTF-8, for error messages.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP client errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Request timeout: {0}")]
    Timeout(String),
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },
    #[error("Request cancelled")]
    Cancelled,
    #[error("IO error: {0}")]
    Io(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP error: {0}")]
    Other(String),
}

/// Trait for HTTP client operations.
///
/// Both methods send `body` verbatim; callers are expected to pass a
/// `Content-Type` header when the body is JSON.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a POST request and buffer the whole response.
    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// Perform a POST request and return the response body as a chunk stream.
    ///
    /// A non-2xx status is reported as [`HttpError::ServerError`] before any
    /// chunk is produced.
    async fn post_stream(&self, url: &str, body: &str, headers: &Headers) -> Result<ByteStream, HttpError>;
}
