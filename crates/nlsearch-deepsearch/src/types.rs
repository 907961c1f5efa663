// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deep Search API request and response types.
//!
//! These are read-through projections of remote state; nothing here is
//! mutated locally.

use serde::{Deserialize, Serialize};

/// An opaque key-value record (source provenance, statistics).
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Body of the "create conversation" call.
#[derive(Debug, Clone, Serialize)]
pub struct CreateConversationRequest<'a> {
    pub question: &'a str,
}

/// A remote conversation and its questions in chronological order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Conversation {
    pub id: i64,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Conversation {
    /// The most recently appended question, if any.
    pub fn latest_question(&self) -> Option<&Question> {
        self.questions.last()
    }
}

/// One natural-language request tracked within a conversation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Question {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub conversation_id: i64,
    #[serde(default)]
    pub question: String,
    /// Absent status reads as an unlabelled, still pending question.
    #[serde(default)]
    pub status: QuestionStatus,
    /// Present once processing finished successfully.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<JsonObject>,
    #[serde(default)]
    pub stats: JsonObject,
}

/// Processing status of a question.
///
/// Only the terminal labels are matched; any other label the service emits
/// is kept verbatim as [`QuestionStatus::InProgress`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionStatus {
    Completed,
    Failed,
    Cancelled,
    InProgress(String),
}

impl Default for QuestionStatus {
    fn default() -> Self {
        Self::InProgress(String::new())
    }
}

impl QuestionStatus {
    /// Terminal statuses never change again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::InProgress(label) => label,
        }
    }
}

impl From<String> for QuestionStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "cancelled" => Self::Cancelled,
            _ => Self::InProgress(label),
        }
    }
}

impl From<QuestionStatus> for String {
    fn from(status: QuestionStatus) -> Self {
        match status {
            QuestionStatus::InProgress(label) => label,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_deserializes_with_sources_and_stats() {
        let json = r#"{
            "id": 42,
            "questions": [{
                "id": 420,
                "conversation_id": 42,
                "question": "find auth code",
                "status": "completed",
                "answer": "repo:foo auth",
                "sources": [{"repository": "github.com/foo/bar", "path": "auth.go"}],
                "stats": {"tool_calls": 3}
            }]
        }"#;
        let conv: Conversation = serde_json::from_str(json).unwrap();
        assert_eq!(conv.id, 42);
        let q = conv.latest_question().unwrap();
        assert_eq!(q.status, QuestionStatus::Completed);
        assert_eq!(q.answer.as_deref(), Some("repo:foo auth"));
        assert_eq!(q.sources.len(), 1);
        assert_eq!(q.sources[0]["path"], "auth.go");
        assert_eq!(q.stats["tool_calls"], 3);
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"id": 1, "questions": [{"id": 2, "conversation_id": 1, "status": "processing"}]}"#;
        let conv: Conversation = serde_json::from_str(json).unwrap();
        let q = &conv.questions[0];
        assert!(q.answer.is_none());
        assert!(q.sources.is_empty());
        assert!(q.stats.is_empty());
        assert_eq!(q.status, QuestionStatus::InProgress("processing".into()));
    }

    #[test]
    fn sparse_question_reads_as_pending() {
        let conv: Conversation = serde_json::from_str(r#"{"id": 3, "questions": [{"answer": "x"}]}"#).unwrap();
        let q = conv.latest_question().unwrap();
        assert_eq!(q.id, 0);
        assert_eq!(q.conversation_id, 0);
        assert_eq!(q.status, QuestionStatus::InProgress(String::new()));
        assert!(!q.status.is_terminal());
    }

    #[test]
    fn missing_questions_is_empty_list() {
        let conv: Conversation = serde_json::from_str(r#"{"id": 9}"#).unwrap();
        assert!(conv.latest_question().is_none());
    }

    #[test]
    fn latest_question_is_the_tail() {
        let json = r#"{"id": 1, "questions": [
            {"id": 1, "conversation_id": 1, "status": "completed"},
            {"id": 2, "conversation_id": 1, "status": "pending"}
        ]}"#;
        let conv: Conversation = serde_json::from_str(json).unwrap();
        assert_eq!(conv.latest_question().unwrap().id, 2);
    }

    #[test]
    fn only_terminal_labels_are_matched() {
        assert!(QuestionStatus::from("completed".to_string()).is_terminal());
        assert!(QuestionStatus::from("failed".to_string()).is_terminal());
        assert!(QuestionStatus::from("cancelled".to_string()).is_terminal());
        assert!(!QuestionStatus::from("pending".to_string()).is_terminal());
        assert!(!QuestionStatus::from("Completed".to_string()).is_terminal());
        assert_eq!(QuestionStatus::from("queued".to_string()).as_str(), "queued");
    }

    #[test]
    fn create_request_serializes_question_field() {
        let body = serde_json::to_string(&CreateConversationRequest { question: "hi" }).unwrap();
        assert_eq!(body, r#"{"question":"hi"}"#);
    }
}
