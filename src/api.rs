//! Backend API client.
//!
//! Three endpoints, all relative to the configured backend URL:
//!
//! - `POST /api/ask-questions` opens the answer stream
//! - `POST /api/chat` sends one follow-up chat turn
//! - `POST /api/summarize-answer` asks for a short answer

use async_trait::async_trait;
use futures_util::stream::Stream;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::adapters::ReqwestHttpClient;
use crate::config::{ClientConfig, DEFAULT_BACKEND_URL};
use crate::error::{MultiqError, MultiqResult, NetworkError};
use crate::events::AnswerEvent;
use crate::models::{AskRequest, ChatReply, ChatRequest, SummarizeRequest, SummaryReply};
use crate::sse::decode_events;
use crate::traits::{ByteStream, ChatBackend, Headers, HttpClient, HttpError, SummaryBackend};

pub const ASK_PATH: &str = "/api/ask-questions";
pub const CHAT_PATH: &str = "/api/chat";
pub const SUMMARIZE_PATH: &str = "/api/summarize-answer";

/// Client for the question-answering backend.
#[derive(Debug, Clone)]
pub struct ApiClient<C: HttpClient = ReqwestHttpClient> {
    base_url: String,
    http: C,
}

impl ApiClient<ReqwestHttpClient> {
    /// Client for the default local backend.
    pub fn new() -> Self {
        Self::with_http(DEFAULT_BACKEND_URL, ReqwestHttpClient::new())
    }

    /// Client for the backend and timeouts in `config`.
    pub fn from_config(config: &ClientConfig) -> MultiqResult<Self> {
        let http = ReqwestHttpClient::from_config(config)
            .map_err(|err| MultiqError::config(format!("cannot build HTTP client: {}", err)))?;
        Ok(Self::with_http(&config.backend_url, http))
    }
}

impl Default for ApiClient<ReqwestHttpClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: HttpClient> ApiClient<C> {
    /// Client over any [`HttpClient`]; trailing slashes on `base_url` are dropped.
    pub fn with_http(base_url: &str, http: C) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn json_headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers
    }

    /// Open the answer stream for `questions`.
    ///
    /// A non-2xx status fails here, before any chunk is read.
    pub async fn ask_questions(&self, questions: &[String]) -> MultiqResult<ByteStream> {
        let url = self.url(ASK_PATH);
        let body = serde_json::to_string(&AskRequest::new(questions.to_vec()))?;

        info!(url = %url, questions = questions.len(), "Opening answer stream");
        let mut headers = Self::json_headers();
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        self.http
            .post_stream(&url, &body, &headers)
            .await
            .map_err(|err| NetworkError::from_http(err, &url).into())
    }

    /// Open the answer stream and decode it into events.
    pub async fn stream_events(
        &self,
        questions: &[String],
    ) -> MultiqResult<impl Stream<Item = Result<AnswerEvent, HttpError>>> {
        let bytes = self.ask_questions(questions).await?;
        Ok(decode_events(bytes))
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> MultiqResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        let body = serde_json::to_string(body)?;

        debug!(url = %url, "POST");
        let response = self
            .http
            .post(&url, &body, &Self::json_headers())
            .await
            .map_err(|err| NetworkError::from_http(err, &url))?;

        if !response.is_success() {
            return Err(NetworkError::HttpStatus {
                status: response.status,
                message: response.text_lossy(),
            }
            .into());
        }

        response.json().map_err(|err| {
            NetworkError::InvalidResponse {
                message: format!("{}: {}", path, err),
            }
            .into()
        })
    }

    /// Send one follow-up chat turn.
    pub async fn chat(&self, request: &ChatRequest) -> MultiqResult<ChatReply> {
        self.post_json(CHAT_PATH, request).await
    }

    /// Ask for a short answer.
    pub async fn summarize(&self, request: &SummarizeRequest) -> MultiqResult<SummaryReply> {
        self.post_json(SUMMARIZE_PATH, request).await
    }
}

#[async_trait]
impl<C: HttpClient> ChatBackend for ApiClient<C> {
    async fn chat(&self, request: &ChatRequest) -> MultiqResult<ChatReply> {
        ApiClient::chat(self, request).await
    }
}

#[async_trait]
impl<C: HttpClient> SummaryBackend for ApiClient<C> {
    async fn summarize(&self, request: &SummarizeRequest) -> MultiqResult<SummaryReply> {
        ApiClient::summarize(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockHttpClient, MockResponse};
    use crate::models::{ChatRole, HistoryEntry};
    use crate::traits::Response;
    use bytes::Bytes;
    use futures_util::StreamExt;

    fn client() -> ApiClient<MockHttpClient> {
        ApiClient::with_http("http://mock/", MockHttpClient::new())
    }

    #[test]
    fn test_base_url_is_trimmed() {
        assert_eq!(client().base_url(), "http://mock");
        assert_eq!(client().url(CHAT_PATH), "http://mock/api/chat");
    }

    #[tokio::test]
    async fn test_ask_questions_sends_question_list() {
        let api = client();
        api.http().set_response(
            "http://mock/api/ask-questions",
            MockResponse::Stream(vec![Bytes::from_static(b"data: {\"type\":\"error\",\"error\":\"x\"}\n")]),
        );

        let questions = vec!["Q1".to_string(), "Q2".to_string()];
        let events: Vec<_> = api.stream_events(&questions).await.unwrap().collect().await;
        assert_eq!(
            events,
            vec![Ok(AnswerEvent::StreamError {
                error: "x".to_string()
            })]
        );

        let requests = api.http().get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].json(), serde_json::json!({"questions": ["Q1", "Q2"]}));
        assert_eq!(
            requests[0].headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_ask_questions_status_failure() {
        let api = client();
        api.http().set_response(
            "http://mock/api/ask-questions",
            MockResponse::Success(Response::new(503, "busy")),
        );

        let err = api.ask_questions(&["Q".to_string()]).await.err().unwrap();
        assert!(matches!(
            err,
            MultiqError::Network(NetworkError::HttpStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let api = client();
        api.http().set_response(
            "http://mock/api/chat",
            MockResponse::Success(Response::new(200, r#"{"success":true,"reply":"Sure."}"#)),
        );

        let request = ChatRequest {
            original_question: "Q".to_string(),
            original_answer: "A".to_string(),
            history: vec![HistoryEntry {
                role: ChatRole::User,
                content: "more?".to_string(),
            }],
            user_message: "more?".to_string(),
        };
        let reply = api.chat(&request).await.unwrap();
        assert!(reply.success);
        assert_eq!(reply.reply, "Sure.");
        assert_eq!(api.http().get_requests()[0].json()["userMessage"], "more?");
    }

    #[tokio::test]
    async fn test_summarize_invalid_json() {
        let api = client();
        api.http().set_response(
            "http://mock/api/summarize-answer",
            MockResponse::Success(Response::new(200, "<html>")),
        );

        let request = SummarizeRequest {
            question: "Q".to_string(),
            answer: "A".to_string(),
        };
        let err = api.summarize(&request).await.unwrap_err();
        assert!(matches!(err, MultiqError::Network(NetworkError::InvalidResponse { .. })));
    }

    #[tokio::test]
    async fn test_connection_failure_maps_to_user_message() {
        let api = client();
        api.http().set_response(
            "http://mock/api/chat",
            MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())),
        );

        let request = ChatRequest {
            original_question: "Q".to_string(),
            original_answer: "A".to_string(),
            history: vec![],
            user_message: "hi".to_string(),
        };
        let err = api.chat(&request).await.unwrap_err();
        assert_eq!(err.user_message(), "Error connecting to server.");
    }
}
