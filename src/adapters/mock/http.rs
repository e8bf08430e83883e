//! Mock HTTP client for testing.
//!
//! Responses are configured per URL; every request is recorded so tests can
//! assert on what was sent.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Headers,
    pub body: String,
}

impl RecordedRequest {
    /// Parse the recorded body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a buffered response
    Success(Response),
    /// Fail the request before any response
    Error(HttpError),
    /// Return a chunk stream that ends normally
    Stream(Vec<Bytes>),
    /// Return a chunk stream that fails after the given chunks
    BrokenStream { chunks: Vec<Bytes>, error: HttpError },
}

/// Mock HTTP client for testing.
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a URL. Matching is exact first, then by prefix.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.responses.lock().unwrap().insert(url.to_string(), response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record_request(&self, url: &str, headers: &Headers, body: &str) {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
            body: body.to_string(),
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        responses
            .iter()
            .find(|(pattern, _)| url.starts_with(pattern.as_str()))
            .map(|(_, response)| response.clone())
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request(url, headers, body);

        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Stream(_)) | Some(MockResponse::BrokenStream { .. }) => {
                Err(HttpError::Other("Stream response on non-stream request".to_string()))
            }
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }

    async fn post_stream(&self, url: &str, body: &str, headers: &Headers) -> Result<ByteStream, HttpError> {
        self.record_request(url, headers, body);

        match self.get_response(url) {
            Some(MockResponse::Stream(chunks)) => {
                Ok(Box::pin(futures::stream::iter(chunks.into_iter().map(Ok))))
            }
            Some(MockResponse::BrokenStream { chunks, error }) => {
                let items = chunks.into_iter().map(Ok).chain(std::iter::once(Err(error)));
                Ok(Box::pin(futures::stream::iter(items)))
            }
            Some(MockResponse::Success(response)) if !response.is_success() => Err(HttpError::ServerError {
                status: response.status,
                message: response.text_lossy(),
            }),
            Some(MockResponse::Success(response)) => {
                Ok(Box::pin(futures::stream::iter(std::iter::once(Ok(response.body)))))
            }
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}
