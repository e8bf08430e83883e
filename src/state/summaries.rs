//! Cached per-answer summaries.

use std::collections::HashMap;

use tracing::debug;

use super::answers::AnswerSet;
use crate::models::SummarizeRequest;

/// What the caller should do after a summary request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryAction {
    /// Nothing to do.
    Ignore,
    /// A cached summary's visibility was flipped.
    Toggle { shown: bool },
    /// Send this request, then report back through [`SummaryStore::complete`].
    Fetch(SummarizeRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CachedSummary {
    text: String,
    shown: bool,
}

/// Summaries keyed by answer index, with at most one fetch in flight.
#[derive(Debug, Clone, Default)]
pub struct SummaryStore {
    cached: HashMap<usize, CachedSummary>,
    in_flight: Option<usize>,
}

impl SummaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for the summary of answer `index`.
    ///
    /// Only finished, non-error answers can be summarized. A cached summary
    /// is toggled rather than fetched again.
    pub fn request(&mut self, index: usize, answers: &AnswerSet) -> SummaryAction {
        let Some(slot) = answers.get(index) else {
            return SummaryAction::Ignore;
        };
        if !slot.is_complete() {
            return SummaryAction::Ignore;
        }

        if let Some(cached) = self.cached.get_mut(&index) {
            cached.shown = !cached.shown;
            return SummaryAction::Toggle { shown: cached.shown };
        }

        if let Some(busy) = self.in_flight {
            debug!(index, busy, "Summary already in flight");
            return SummaryAction::Ignore;
        }

        self.in_flight = Some(index);
        SummaryAction::Fetch(SummarizeRequest {
            question: slot.question.clone(),
            answer: slot.answer.clone(),
        })
    }

    /// Record the outcome of a fetch. `None` (or an empty summary) leaves the
    /// cache as it was.
    pub fn complete(&mut self, index: usize, summary: Option<String>) {
        if self.in_flight == Some(index) {
            self.in_flight = None;
        }
        match summary {
            Some(text) if !text.is_empty() => {
                self.cached.insert(index, CachedSummary { text, shown: true });
            }
            _ => debug!(index, "No summary recorded"),
        }
    }

    pub fn summary(&self, index: usize) -> Option<&str> {
        self.cached.get(&index).map(|cached| cached.text.as_str())
    }

    pub fn is_shown(&self, index: usize) -> bool {
        self.cached.get(&index).is_some_and(|cached| cached.shown)
    }

    pub fn show(&mut self, index: usize) {
        if let Some(cached) = self.cached.get_mut(&index) {
            cached.shown = true;
        }
    }

    pub fn hide(&mut self, index: usize) {
        if let Some(cached) = self.cached.get_mut(&index) {
            cached.shown = false;
        }
    }

    pub fn in_flight(&self) -> Option<usize> {
        self.in_flight
    }

    /// Forget everything; used when a new set of questions is submitted.
    pub fn clear(&mut self) {
        self.cached.clear();
        self.in_flight = None;
    }
}
