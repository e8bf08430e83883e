//! Reduced client state.
//!
//! - [`AnswerSet`]: per-question answer slots reduced from stream events
//! - [`ProgressTracker`]: monotonic completion percentage
//! - [`SummaryStore`]: cached short answers

pub mod answers;
pub mod progress;
pub mod summaries;

pub use answers::{apply, AnswerSet, AnswerSlot, Applied};
pub use progress::ProgressTracker;
pub use summaries::{SummaryAction, SummaryStore};
