// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON bodies shaped like Deep Search API responses.

use serde_json::{Value, json};

/// A conversation holding `questions` in chronological order.
pub fn conversation(id: i64, questions: Vec<Value>) -> Value {
    json!({
        "id": id,
        "questions": questions,
    })
}

/// A question with the given status and no answer yet.
pub fn question(id: i64, conversation_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "conversation_id": conversation_id,
        "question": "Convert this natural language request",
        "status": status,
        "stats": {},
    })
}

/// A completed question carrying an answer and source records.
pub fn completed_question(id: i64, conversation_id: i64, answer: &str, sources: Vec<Value>) -> Value {
    json!({
        "id": id,
        "conversation_id": conversation_id,
        "question": "Convert this natural language request",
        "status": "completed",
        "answer": answer,
        "sources": sources,
        "stats": {"time_ms": 1234, "tool_calls": 3},
    })
}

/// A source record of the kind Deep Search attaches to answers.
pub fn source(repository: &str, path: &str) -> Value {
    json!({
        "type": "file",
        "repository": repository,
        "path": path,
    })
}

/// A freshly created conversation with one question still processing.
pub fn pending_conversation(id: i64) -> Value {
    conversation(id, vec![question(id * 10, id, "processing")])
}
