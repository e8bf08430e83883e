use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::request::HistoryEntry;

/// Role of a message in a follow-up chat
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One transcript entry of a follow-up chat
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// When the message was added locally
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    /// Wire form sent upstream as history; the timestamp stays local.
    pub fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            role: self.role,
            content: self.content.clone(),
        }
    }

    /// Local wall-clock time as `HH:MM`.
    pub fn formatted_time(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChatRole::Assistant).unwrap(), "\"assistant\"");
        let role: ChatRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, ChatRole::User);
        assert_eq!(ChatRole::User.as_str(), "user");
    }

    #[test]
    fn test_history_entry_drops_timestamp() {
        let msg = ChatMessage::user("why?");
        let entry = msg.to_history_entry();
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            serde_json::json!({"role": "user", "content": "why?"})
        );
    }

    #[test]
    fn test_formatted_time_shape() {
        let time = ChatMessage::assistant("hi").formatted_time();
        assert_eq!(time.len(), 5);
        assert_eq!(time.as_bytes()[2], b':');
    }
}
