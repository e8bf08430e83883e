//! Lines to events.

use thiserror::Error;
use tracing::debug;

use crate::events::AnswerEvent;

/// Marker that starts every event record.
pub const RECORD_PREFIX: &str = "data: ";

/// Why a line did not produce an event.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Keep-alives, comments, blank separators
    #[error("line is not a data record")]
    NotARecord,

    #[error("invalid event JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Parse one line into an event.
///
/// Unknown record types parse successfully as [`AnswerEvent::Unknown`].
pub fn parse_record(line: &str) -> Result<AnswerEvent, ParseError> {
    let payload = line.strip_prefix(RECORD_PREFIX).ok_or(ParseError::NotARecord)?;
    Ok(serde_json::from_str(payload)?)
}

/// Counters for what the parser dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub events: usize,
    pub non_records: usize,
    pub malformed: usize,
    pub unknown: usize,
}

/// Line filter and classifier for the answer stream.
///
/// Never fails: lines without the record prefix, records that are not valid
/// JSON events, and unknown record types are counted and skipped.
#[derive(Debug, Default)]
pub struct EventParser {
    stats: ParseStats,
}

impl EventParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&mut self, line: &str) -> Option<AnswerEvent> {
        match parse_record(line) {
            Ok(AnswerEvent::Unknown) => {
                self.stats.unknown += 1;
                debug!("Skipping record with unknown type");
                None
            }
            Ok(event) => {
                self.stats.events += 1;
                Some(event)
            }
            Err(ParseError::NotARecord) => {
                self.stats.non_records += 1;
                None
            }
            Err(err) => {
                self.stats.malformed += 1;
                debug!(error = %err, line_len = line.len(), "Skipping malformed record");
                None
            }
        }
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }
}
