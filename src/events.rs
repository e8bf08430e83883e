//! Typed answer-stream events.
//!
//! Each record on the answer stream is one JSON object discriminated by
//! `type`:
//!
//! ```text
//! {"type":"progress","index":0,"total":2,"current":1,"question":"..."}
//! {"type":"token","index":0,"chunk":"..."}
//! {"type":"answer_done","index":0,"question":"...","answer":"...","error":false}
//! {"type":"error","error":"..."}
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One classified record from the answer stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerEvent {
    /// Processing of the question at `index` (0-based) has begun.
    /// `current` is 1-based and counts questions started so far.
    Progress {
        index: usize,
        total: usize,
        current: usize,
        question: String,
    },
    /// Text to append to the in-progress answer at `index`.
    Token { index: usize, chunk: String },
    /// The answer at `index` is final. With `error` set, `answer` carries a
    /// user-facing error string.
    AnswerDone {
        index: usize,
        question: String,
        #[serde(default, deserialize_with = "null_as_default")]
        answer: String,
        #[serde(default, deserialize_with = "null_as_default")]
        error: bool,
    },
    /// Stream-scoped failure not tied to one question.
    #[serde(rename = "error")]
    StreamError { error: String },
    /// A record type this client does not know.
    #[serde(other)]
    Unknown,
}

impl AnswerEvent {
    /// Returns the wire `type` name, for logging.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            AnswerEvent::Progress { .. } => "progress",
            AnswerEvent::Token { .. } => "token",
            AnswerEvent::AnswerDone { .. } => "answer_done",
            AnswerEvent::StreamError { .. } => "error",
            AnswerEvent::Unknown => "unknown",
        }
    }

    /// The question index this event addresses, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            AnswerEvent::Progress { index, .. }
            | AnswerEvent::Token { index, .. }
            | AnswerEvent::AnswerDone { index, .. } => Some(*index),
            AnswerEvent::StreamError { .. } | AnswerEvent::Unknown => None,
        }
    }
}
