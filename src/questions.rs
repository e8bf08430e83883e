//! Question input handling.
//!
//! The question box takes one question per line, capped at [`MAX_CHARS`].

use crate::error::{MultiqError, MultiqResult};

/// Maximum length of the question input, in characters.
pub const MAX_CHARS: usize = 5000;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter at least one question";

/// Split input into questions: one per line, blank lines dropped.
///
/// Lines are kept as typed; only the blank check trims.
pub fn parse_questions(text: &str) -> Vec<String> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Truncate `text` to at most `max_chars` characters.
pub fn clamp_input(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_offset, _)) => &text[..byte_offset],
        None => text,
    }
}

/// Parse input for submission, rejecting input with no questions.
pub fn questions_for_submit(text: &str) -> MultiqResult<Vec<String>> {
    let questions = parse_questions(text);
    if questions.is_empty() {
        return Err(MultiqError::input(EMPTY_INPUT_MESSAGE));
    }
    Ok(questions)
}

/// Counters shown in the input stats panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputStats {
    pub characters: usize,
    pub words: usize,
    pub lines: usize,
    pub questions: usize,
}

impl InputStats {
    pub fn of(text: &str) -> Self {
        Self {
            characters: text.chars().count(),
            words: text.split_whitespace().count(),
            lines: text.split('\n').count(),
            questions: parse_questions(text).len(),
        }
    }
}
