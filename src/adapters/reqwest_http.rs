//! Reqwest-based HTTP client adapter.

use async_trait::async_trait;
use futures_util::StreamExt;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

/// [`HttpClient`] backed by a shared `reqwest::Client`.
///
/// Buffered posts are bounded by the configured request timeout. Streaming
/// posts only get the connect timeout: an answer stream stays open for as
/// long as the backend keeps producing answers.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    request_timeout: Option<Duration>,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            request_timeout: None,
        }
    }

    /// Wrap a preconfigured `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            request_timeout: None,
        }
    }

    /// Build a client with the timeouts from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| HttpError::Other(e.to_string()))?;

        Ok(Self {
            client,
            request_timeout: Some(config.request_timeout),
        })
    }

    /// Get a reference to the underlying reqwest::Client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    fn apply_headers(builder: reqwest::RequestBuilder, headers: &Headers) -> reqwest::RequestBuilder {
        headers
            .iter()
            .fold(builder, |builder, (key, value)| builder.header(key, value))
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        let mut builder = self.client.post(url).body(body.to_string());
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        let builder = Self::apply_headers(builder, headers);

        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(Response::new(status, body))
    }

    async fn post_stream(&self, url: &str, body: &str, headers: &Headers) -> Result<ByteStream, HttpError> {
        let builder = self.client.post(url).body(body.to_string());
        let builder = Self::apply_headers(builder, headers);

        let response = builder.send().await.map_err(Self::convert_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(HttpError::ServerError { status, message });
        }

        let stream = response.bytes_stream().map(|result| {
            result.map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout(e.to_string())
                } else {
                    HttpError::Io(e.to_string())
                }
            })
        });

        Ok(Box::pin(stream))
    }
}
