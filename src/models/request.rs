use serde::{Deserialize, Serialize};

use super::message::ChatRole;

/// Body of `POST /api/ask-questions`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AskRequest {
    pub questions: Vec<String>,
}

impl AskRequest {
    pub fn new(questions: Vec<String>) -> Self {
        Self { questions }
    }
}

/// A prior chat turn as sent upstream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub role: ChatRole,
    pub content: String,
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub original_question: String,
    pub original_answer: String,
    /// Transcript without the seed message
    pub history: Vec<HistoryEntry>,
    pub user_message: String,
}

/// Response of `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub success: bool,
    #[serde(default)]
    pub reply: String,
}

/// Body of `POST /api/summarize-answer`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummarizeRequest {
    pub question: String,
    pub answer: String,
}

/// Response of `POST /api/summarize-answer`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryReply {
    pub success: bool,
    #[serde(default)]
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_uses_camel_case() {
        let request = ChatRequest {
            original_question: "Q".to_string(),
            original_answer: "A".to_string(),
            history: vec![HistoryEntry {
                role: ChatRole::User,
                content: "first".to_string(),
            }],
            user_message: "second".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "originalQuestion": "Q",
                "originalAnswer": "A",
                "history": [{"role": "user", "content": "first"}],
                "userMessage": "second"
            })
        );
    }

    #[test]
    fn test_failed_reply_without_text() {
        let reply: ChatReply = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!reply.success);
        assert!(reply.reply.is_empty());

        let summary: SummaryReply = serde_json::from_str(r#"{"success":false,"error":"x"}"#).unwrap();
        assert!(!summary.success);
    }

    #[test]
    fn test_ask_request_shape() {
        let request = AskRequest::new(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"questions":["a","b"]}"#
        );
    }
}
