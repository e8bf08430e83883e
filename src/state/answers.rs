//! Per-question answer state.
//!
//! [`AnswerSet`] is the reduced view of one answer stream: a sparse map from
//! question index to [`AnswerSlot`]. Slots are created by `progress`, grow on
//! `token`, and are finalized by `answer_done`. A finalized slot never goes
//! back to streaming unless a new `progress` for the same index overwrites it.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::events::AnswerEvent;

/// State of one question's answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnswerSlot {
    pub question: String,
    /// Accumulated answer text. Append-only while streaming.
    pub answer: String,
    pub is_error: bool,
    pub is_streaming: bool,
}

impl AnswerSlot {
    /// A slot whose answer has just started.
    pub fn started(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: String::new(),
            is_error: false,
            is_streaming: true,
        }
    }

    /// A finalized slot.
    pub fn finished(question: impl Into<String>, answer: impl Into<String>, is_error: bool) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            is_error,
            is_streaming: false,
        }
    }

    /// Finalized without error; the only state chat and summaries accept.
    pub fn is_complete(&self) -> bool {
        !self.is_error && !self.is_streaming
    }
}

/// Outcome of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A slot was created, extended, or overwritten.
    Changed,
    /// The event was dropped; the set is as before.
    Unchanged,
    /// A stream-scoped error. The set is untouched; the message belongs on the
    /// session's error channel.
    StreamError(String),
}

/// Ordered, index-addressed answer slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnswerSet {
    slots: BTreeMap<usize, AnswerSlot>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&AnswerSlot> {
        self.slots.get(&index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.slots.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &AnswerSlot)> {
        self.slots.iter().map(|(index, slot)| (*index, slot))
    }

    /// Number of present slots that are not errors.
    pub fn answered_count(&self) -> usize {
        self.slots.values().filter(|slot| !slot.is_error).count()
    }

    /// Highest index that has started.
    pub fn current_index(&self) -> Option<usize> {
        self.slots.keys().next_back().copied()
    }

    /// A slot is shown once its index is at or below the highest started one.
    pub fn is_visible(&self, index: usize) -> bool {
        self.current_index().is_some_and(|current| index <= current)
    }

    /// True when there is at least one slot and none is still streaming.
    pub fn all_finished(&self) -> bool {
        !self.slots.is_empty() && self.slots.values().all(|slot| !slot.is_streaming)
    }

    /// Apply one event in place.
    pub fn apply_event(&mut self, event: &AnswerEvent) -> Applied {
        match event {
            AnswerEvent::Progress { index, question, .. } => {
                self.slots.insert(*index, AnswerSlot::started(question.clone()));
                Applied::Changed
            }
            AnswerEvent::Token { index, chunk } => match self.slots.get_mut(index) {
                Some(slot) if slot.is_streaming => {
                    slot.answer.push_str(chunk);
                    Applied::Changed
                }
                Some(_) => {
                    warn!(index, "Dropping token for a finished answer");
                    Applied::Unchanged
                }
                None => {
                    warn!(index, "Dropping token for an answer that never started");
                    Applied::Unchanged
                }
            },
            AnswerEvent::AnswerDone {
                index,
                question,
                answer,
                error,
            } => {
                self.slots
                    .insert(*index, AnswerSlot::finished(question.clone(), answer.clone(), *error));
                Applied::Changed
            }
            AnswerEvent::StreamError { error } => Applied::StreamError(error.clone()),
            AnswerEvent::Unknown => Applied::Unchanged,
        }
    }
}

/// Pure form of [`AnswerSet::apply_event`]: `current` is left as it was.
pub fn apply(event: &AnswerEvent, current: &AnswerSet) -> (AnswerSet, Applied) {
    let mut next = current.clone();
    let applied = next.apply_event(event);
    (next, applied)
}
