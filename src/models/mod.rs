//! Wire and transcript models for the backend requests.

mod message;
mod request;

pub use message::{ChatMessage, ChatRole};
pub use request::{AskRequest, ChatReply, ChatRequest, HistoryEntry, SummarizeRequest, SummaryReply};
