//! Follow-up chat about one finished answer.
//!
//! A [`ConversationEngine`] holds the transcript for one chat session and
//! gates requests so that at most one is outstanding:
//!
//! ```text
//! Idle --send--> AwaitingReply --reply/failure--> Idle
//!   \________________close_______________________--> Closed
//! ```
//!
//! Sending is split in two so the caller controls the I/O: [`begin_send`]
//! records the user turn and hands back the request plus a [`ReplyTicket`];
//! [`complete`] reconciles the outcome. Completions for a closed session or
//! an outdated ticket change nothing.
//!
//! [`begin_send`]: ConversationEngine::begin_send
//! [`complete`]: ConversationEngine::complete

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::MultiqResult;
use crate::models::{ChatMessage, ChatReply, ChatRequest, HistoryEntry};
use crate::state::AnswerSlot;
use crate::traits::ChatBackend;

/// Session error when the backend answered `success: false`.
pub const CHAT_DECLINED_MESSAGE: &str = "Failed to get response. Please try again.";
/// Session error when the request did not get an answer at all.
pub const CHAT_CONNECTION_MESSAGE: &str = "Error connecting to server.";

/// Text of the synthetic assistant message that opens every session.
pub fn seed_text(question: &str, answer: &str) -> String {
    format!(
        "Hi! I can answer follow-up questions about:\n\n**Q:** {}\n**A:** {}\n\nWhat would you like to know more about?",
        question, answer
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    AwaitingReply,
    Closed,
}

/// Identifies one outstanding chat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyTicket(u64);

/// Transcript and request gate for one follow-up chat session.
#[derive(Debug, Clone)]
pub struct ConversationEngine {
    session_id: Uuid,
    question: String,
    answer: String,
    transcript: Vec<ChatMessage>,
    state: ConversationState,
    error: Option<String>,
    next_ticket: u64,
    in_flight: Option<ReplyTicket>,
}

impl ConversationEngine {
    /// Start a session about `question`/`answer`, seeded with the greeting.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        let question = question.into();
        let answer = answer.into();
        let seed = ChatMessage::assistant(seed_text(&question, &answer));
        let session_id = Uuid::new_v4();
        debug!(%session_id, "Chat session opened");

        Self {
            session_id,
            question,
            answer,
            transcript: vec![seed],
            state: ConversationState::Idle,
            error: None,
            next_ticket: 0,
            in_flight: None,
        }
    }

    /// Start a session about a slot, if the slot can be chatted about: it must
    /// be finished and not an error.
    pub fn open(slot: &AnswerSlot) -> Option<Self> {
        if !slot.is_complete() {
            debug!(
                is_error = slot.is_error,
                is_streaming = slot.is_streaming,
                "Answer not eligible for chat"
            );
            return None;
        }
        Some(Self::new(slot.question.clone(), slot.answer.clone()))
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// Every message, seed first.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn seed(&self) -> &ChatMessage {
        &self.transcript[0]
    }

    /// Last failure, cleared by the next send.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.state == ConversationState::AwaitingReply
    }

    /// The transcript as sent upstream: without the seed.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.transcript[1..].iter().map(ChatMessage::to_history_entry).collect()
    }

    /// Record the user's turn and build its request.
    ///
    /// Returns `None`, changing nothing, when `text` is blank or the session
    /// is not idle.
    pub fn begin_send(&mut self, text: &str) -> Option<(ReplyTicket, ChatRequest)> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if self.state != ConversationState::Idle {
            debug!(session_id = %self.session_id, state = ?self.state, "Ignoring send");
            return None;
        }

        let request = ChatRequest {
            original_question: self.question.clone(),
            original_answer: self.answer.clone(),
            history: self.history(),
            user_message: text.to_string(),
        };

        self.transcript.push(ChatMessage::user(text));
        self.error = None;
        self.state = ConversationState::AwaitingReply;

        let ticket = ReplyTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);

        Some((ticket, request))
    }

    /// Reconcile the outcome of the request issued with `ticket`.
    ///
    /// Returns whether the outcome was applied.
    pub fn complete(&mut self, ticket: ReplyTicket, outcome: MultiqResult<ChatReply>) -> bool {
        if self.state == ConversationState::Closed {
            debug!(session_id = %self.session_id, "Reply after close ignored");
            return false;
        }
        if self.in_flight != Some(ticket) {
            debug!(session_id = %self.session_id, ?ticket, "Stale reply ignored");
            return false;
        }

        match outcome {
            Ok(reply) if reply.success => {
                self.transcript.push(ChatMessage::assistant(reply.reply));
            }
            Ok(_) => {
                warn!(session_id = %self.session_id, "Chat request declined by backend");
                self.error = Some(CHAT_DECLINED_MESSAGE.to_string());
            }
            Err(err) => {
                warn!(session_id = %self.session_id, error = %err, "Chat request failed");
                self.error = Some(CHAT_CONNECTION_MESSAGE.to_string());
            }
        }

        self.in_flight = None;
        self.state = ConversationState::Idle;
        true
    }

    /// End the session. Later completions are ignored.
    pub fn close(&mut self) {
        if self.state != ConversationState::Closed {
            info!(
                session_id = %self.session_id,
                messages = self.transcript.len(),
                "Chat session closed"
            );
        }
        self.state = ConversationState::Closed;
        self.in_flight = None;
    }

    /// Send `text` through `backend` and reconcile the outcome.
    ///
    /// Returns `false` when the send was a no-op.
    pub async fn send<B: ChatBackend + ?Sized>(&mut self, backend: &B, text: &str) -> bool {
        let Some((ticket, request)) = self.begin_send(text) else {
            return false;
        };
        let outcome = backend.chat(&request).await;
        self.complete(ticket, outcome)
    }
}
