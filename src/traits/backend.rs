//! Request/response collaborators for the follow-up features.
//!
//! [`ConversationEngine`](crate::conversation::ConversationEngine) and the
//! summary flow only need "send this, get a reply or a failure". Keeping that
//! behind a trait lets them be driven by [`ApiClient`](crate::api::ApiClient)
//! or by a scripted backend in tests.

use async_trait::async_trait;

use crate::error::MultiqResult;
use crate::models::{ChatReply, ChatRequest, SummarizeRequest, SummaryReply};

/// One-shot follow-up chat request.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> MultiqResult<ChatReply>;
}

/// One-shot "summarize this answer" request.
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    async fn summarize(&self, request: &SummarizeRequest) -> MultiqResult<SummaryReply>;
}
