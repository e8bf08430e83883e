//! Common test utilities for integration tests.
//!
//! Wire-format builders for answer-stream records and a chunker that splits
//! a body at arbitrary points.

#![allow(dead_code)]

use bytes::Bytes;
use serde_json::json;

pub fn progress(index: usize, total: usize, question: &str) -> String {
    record(json!({
        "type": "progress",
        "index": index,
        "total": total,
        "current": index + 1,
        "question": question,
    }))
}

pub fn token(index: usize, chunk: &str) -> String {
    record(json!({"type": "token", "index": index, "chunk": chunk}))
}

pub fn done(index: usize, question: &str, answer: &str, error: bool) -> String {
    record(json!({
        "type": "answer_done",
        "index": index,
        "question": question,
        "answer": answer,
        "error": error,
    }))
}

pub fn stream_error(message: &str) -> String {
    record(json!({"type": "error", "error": message}))
}

fn record(value: serde_json::Value) -> String {
    format!("data: {}\n", value)
}

/// The two-question scenario: one streamed answer, one failed answer.
pub fn two_question_body() -> String {
    [
        progress(0, 2, "Q1"),
        token(0, "Hel"),
        token(0, "lo"),
        done(0, "Q1", "Hello", false),
        progress(1, 2, "Q2"),
        done(1, "Q2", "Model unavailable", true),
    ]
    .concat()
}

/// Split `body` into chunks of `size` bytes, ignoring character boundaries.
pub fn chunked(body: &[u8], size: usize) -> Vec<Bytes> {
    body.chunks(size.max(1)).map(Bytes::copy_from_slice).collect()
}
