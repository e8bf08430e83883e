//! Scripted chat/summary backend for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::{MultiqResult, NetworkError};
use crate::models::{ChatReply, ChatRequest, SummarizeRequest, SummaryReply};
use crate::traits::{ChatBackend, SummaryBackend};

/// One scripted outcome, consumed in order.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// `{"success": true, ...}` with the given text
    Reply(String),
    /// `{"success": false}`
    Declined,
    /// Transport failure
    Fail(NetworkError),
}

/// Backend that answers from a script and records every request.
///
/// When the script runs dry, requests fail with a connection error.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    chat_requests: Arc<Mutex<Vec<ChatRequest>>>,
    summary_requests: Arc<Mutex<Vec<SummarizeRequest>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(outcomes: impl IntoIterator<Item = Scripted>) -> Self {
        let backend = Self::new();
        backend.script.lock().unwrap().extend(outcomes);
        backend
    }

    pub fn push(&self, outcome: Scripted) {
        self.script.lock().unwrap().push_back(outcome);
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().unwrap().clone()
    }

    pub fn summary_requests(&self) -> Vec<SummarizeRequest> {
        self.summary_requests.lock().unwrap().clone()
    }

    fn next(&self) -> Scripted {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Scripted::Fail(NetworkError::ConnectionFailed {
                    url: "scripted".to_string(),
                    message: "script exhausted".to_string(),
                })
            })
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn chat(&self, request: &ChatRequest) -> MultiqResult<ChatReply> {
        self.chat_requests.lock().unwrap().push(request.clone());
        match self.next() {
            Scripted::Reply(reply) => Ok(ChatReply { success: true, reply }),
            Scripted::Declined => Ok(ChatReply {
                success: false,
                reply: String::new(),
            }),
            Scripted::Fail(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl SummaryBackend for ScriptedBackend {
    async fn summarize(&self, request: &SummarizeRequest) -> MultiqResult<SummaryReply> {
        self.summary_requests.lock().unwrap().push(request.clone());
        match self.next() {
            Scripted::Reply(summary) => Ok(SummaryReply { success: true, summary }),
            Scripted::Declined => Ok(SummaryReply {
                success: false,
                summary: String::new(),
            }),
            Scripted::Fail(err) => Err(err.into()),
        }
    }
}
