//! Chunk-boundary behaviour of the decode pipeline.
//!
//! However a well-formed stream is split, the decoded lines and the reduced
//! answers must match the unsplit stream.

mod common;

use common::{chunked, done, progress, token, two_question_body};
use futures_util::stream::{self, StreamExt};
use multiq::session::AskSession;
use multiq::sse::{decode_lines, FrameDecoder};
use multiq::traits::HttpError;

fn unicode_body() -> String {
    [
        progress(0, 1, "Qu'est-ce que c'est?"),
        token(0, "Réponse "),
        token(0, "日本語 "),
        token(0, "🦀\r"),
        done(0, "Qu'est-ce que c'est?", "Réponse 日本語 🦀", false),
    ]
    .concat()
}

fn decode_all(chunks: &[&[u8]]) -> Vec<String> {
    let mut decoder = FrameDecoder::new();
    let mut lines = Vec::new();
    for chunk in chunks {
        lines.extend(decoder.push(chunk));
    }
    decoder.finish();
    lines
}

#[test]
fn test_every_two_way_split_yields_same_lines() {
    let body = unicode_body();
    let bytes = body.as_bytes();
    let expected = decode_all(&[bytes]);
    assert_eq!(expected.len(), 5);

    for split in 0..=bytes.len() {
        let (head, tail) = bytes.split_at(split);
        assert_eq!(decode_all(&[head, tail]), expected, "split at byte {}", split);
    }
}

#[test]
fn test_every_chunk_size_yields_same_answers() {
    let body = unicode_body() + &two_question_body();

    let mut reference = AskSession::new(vec!["Q1".to_string(), "Q2".to_string()]);
    for line in decode_all(&[body.as_bytes()]) {
        reference.apply_line(&line);
    }

    for size in 1..=17 {
        let mut session = AskSession::new(vec!["Q1".to_string(), "Q2".to_string()]);
        let chunks = chunked(body.as_bytes(), size);
        let parts: Vec<&[u8]> = chunks.iter().map(|chunk| &chunk[..]).collect();
        for line in decode_all(&parts) {
            session.apply_line(&line);
        }
        assert_eq!(session.answers(), reference.answers(), "chunk size {}", size);
    }
}

#[tokio::test]
async fn test_byte_at_a_time_stream() {
    let body = two_question_body();
    let items: Vec<Result<_, HttpError>> = chunked(body.as_bytes(), 1).into_iter().map(Ok).collect();

    let lines: Vec<String> = decode_lines(stream::iter(items))
        .map(|line| line.unwrap())
        .collect()
        .await;

    assert_eq!(lines.len(), 6);
    assert!(lines.iter().all(|line| line.starts_with("data: {")));
}

#[test]
fn test_unterminated_tail_is_discarded() {
    let body = format!("{}{}", progress(0, 1, "Q"), "data: {\"type\":\"token\",\"index\":0,\"chunk\":\"x\"}");
    let lines = decode_all(&[body.as_bytes()]);
    assert_eq!(lines.len(), 1);
}

#[test]
fn test_byte_order_mark_does_not_hide_first_record() {
    let body = two_question_body();
    let mut reference = AskSession::new(vec!["Q1".to_string(), "Q2".to_string()]);
    for line in decode_all(&[body.as_bytes()]) {
        reference.apply_line(&line);
    }

    let mut marked = b"\xEF\xBB\xBF".to_vec();
    marked.extend_from_slice(body.as_bytes());
    for split in 0..=4 {
        let (head, tail) = marked.split_at(split);
        let mut session = AskSession::new(vec!["Q1".to_string(), "Q2".to_string()]);
        for line in decode_all(&[head, tail]) {
            session.apply_line(&line);
        }
        assert_eq!(session.parse_stats().non_records, 0, "split at byte {}", split);
        assert_eq!(session.answers(), reference.answers(), "split at byte {}", split);
    }
}
