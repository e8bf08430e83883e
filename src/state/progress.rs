//! Completion percentage for one answer stream.

use crate::events::AnswerEvent;

/// Tracks a monotonic completion percentage in `[0, 100]`.
///
/// `progress` events report `current / total`; `answer_done` events report
/// `(index + 1) / question_count`. Once a done signal has been seen, started
/// signals no longer move the value.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressTracker {
    question_count: usize,
    percent: f64,
    saw_done: bool,
    finished: bool,
}

impl ProgressTracker {
    pub fn new(question_count: usize) -> Self {
        Self {
            question_count,
            percent: 0.0,
            saw_done: false,
            finished: false,
        }
    }

    /// Feed one event. Returns the new percentage when it moved.
    pub fn observe(&mut self, event: &AnswerEvent) -> Option<f64> {
        if self.finished {
            return None;
        }

        let candidate = match event {
            AnswerEvent::Progress { current, total, .. } => {
                if self.saw_done || *total == 0 {
                    return None;
                }
                *current as f64 / *total as f64 * 100.0
            }
            AnswerEvent::AnswerDone { index, .. } => {
                if self.question_count == 0 {
                    return None;
                }
                self.saw_done = true;
                (*index + 1) as f64 / self.question_count as f64 * 100.0
            }
            AnswerEvent::Token { .. } | AnswerEvent::StreamError { .. } | AnswerEvent::Unknown => return None,
        };

        let candidate = candidate.clamp(0.0, 100.0);
        if candidate > self.percent {
            self.percent = candidate;
            Some(candidate)
        } else {
            None
        }
    }

    /// The stream ended, cleanly or not.
    pub fn finish(&mut self) {
        self.percent = 100.0;
        self.finished = true;
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Whole percent, for display.
    pub fn rounded(&self) -> u8 {
        self.percent.round() as u8
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
