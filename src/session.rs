//! One question submission, from request to last event.
//!
//! [`AskSession`] owns the reduced state of one answer stream and is its only
//! writer. Readers get [`AskSnapshot`]s, either by asking or through a
//! `tokio::sync::watch` channel that [`AskSession::drive`] publishes to after
//! every chunk that changed something.

use bytes::Bytes;
use futures_util::stream::Stream;
use futures_util::StreamExt;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::{MultiqError, MultiqResult, StreamError};
use crate::events::AnswerEvent;
use crate::questions::EMPTY_INPUT_MESSAGE;
use crate::sse::{EventParser, FrameDecoder, ParseStats};
use crate::state::{AnswerSet, Applied, ProgressTracker};
use crate::traits::{HttpClient, HttpError};

pub use crate::error::STREAM_FAILURE_MESSAGE;

/// Read-only copy of a session's observable state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AskSnapshot {
    pub answers: AnswerSet,
    /// Completion percentage in `[0, 100]`
    pub progress: f64,
    /// Stream-scoped error, if any
    pub error: Option<String>,
    pub loading: bool,
}

/// Reduced state of one answer stream.
#[derive(Debug)]
pub struct AskSession {
    questions: Vec<String>,
    answers: AnswerSet,
    progress: ProgressTracker,
    parser: EventParser,
    error: Option<String>,
    loading: bool,
}

impl AskSession {
    pub fn new(questions: Vec<String>) -> Self {
        let progress = ProgressTracker::new(questions.len());
        Self {
            questions,
            answers: AnswerSet::new(),
            progress,
            parser: EventParser::new(),
            error: None,
            loading: true,
        }
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn progress(&self) -> f64 {
        self.progress.percent()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn parse_stats(&self) -> ParseStats {
        self.parser.stats()
    }

    /// Apply one event to the answers, the progress and the error channel.
    ///
    /// Indices beyond the submitted question count are logged and applied.
    pub fn apply(&mut self, event: &AnswerEvent) -> Applied {
        if let Some(index) = event.index() {
            if index >= self.questions.len() {
                warn!(
                    index,
                    questions = self.questions.len(),
                    event = event.event_type_name(),
                    "Event index beyond submitted questions"
                );
            }
        }

        self.progress.observe(event);
        let applied = self.answers.apply_event(event);
        if let Applied::StreamError(message) = &applied {
            let err = StreamError::BackendError {
                message: message.clone(),
            };
            warn!(error = %err, code = err.error_code(), "Backend reported a stream error");
            self.error = Some(err.user_message());
        }
        applied
    }

    /// Parse one decoded line and apply it. `None` when the line carried no event.
    pub fn apply_line(&mut self, line: &str) -> Option<Applied> {
        let event = self.parser.parse(line)?;
        Some(self.apply(&event))
    }

    /// The stream could not be opened or broke off.
    pub fn fail(&mut self, cause: StreamError) {
        warn!(error = %cause, code = cause.error_code(), "Answer stream failed");
        self.error = Some(cause.user_message());
        self.progress.finish();
    }

    /// The stream is over, cleanly or not.
    pub fn finish(&mut self) {
        self.progress.finish();
        self.loading = false;
    }

    pub fn snapshot(&self) -> AskSnapshot {
        AskSnapshot {
            answers: self.answers.clone(),
            progress: self.progress.percent(),
            error: self.error.clone(),
            loading: self.loading,
        }
    }

    fn publish(&self, updates: Option<&watch::Sender<AskSnapshot>>) {
        if let Some(tx) = updates {
            tx.send_replace(self.snapshot());
        }
    }

    /// Consume a chunk stream to its end and finish the session.
    ///
    /// Each chunk's lines are fully applied before the next chunk is awaited,
    /// and at most one snapshot is published per chunk. A transport error
    /// stops consumption and marks the session failed; the slots reduced so
    /// far are kept.
    ///
    /// Returns the number of snapshots published.
    pub async fn drive<S>(
        &mut self,
        mut bytes: S,
        updates: Option<&watch::Sender<AskSnapshot>>,
    ) -> usize
    where
        S: Stream<Item = Result<Bytes, HttpError>> + Unpin,
    {
        let mut decoder = FrameDecoder::new();
        let mut published = 0;

        while let Some(item) = bytes.next().await {
            match item {
                Ok(chunk) => {
                    let mut changed = false;
                    for line in decoder.push(&chunk) {
                        if let Some(applied) = self.apply_line(&line) {
                            changed |= applied != Applied::Unchanged;
                        }
                    }
                    if changed && updates.is_some() {
                        self.publish(updates);
                        published += 1;
                    }
                }
                Err(err) => {
                    self.fail(StreamError::ConnectionLost {
                        message: err.to_string(),
                    });
                    break;
                }
            }
        }

        decoder.finish();
        self.finish();
        let stats = self.parser.stats();
        debug!(
            events = stats.events,
            skipped = stats.non_records,
            malformed = stats.malformed,
            unknown = stats.unknown,
            "Answer stream closed"
        );
        if updates.is_some() {
            self.publish(updates);
            published += 1;
        }
        published
    }
}

/// Submit `questions` and drive the answer stream to completion.
///
/// An empty question list is rejected before any request. Failing to open
/// the stream is not an error of this function: it is recorded on the
/// returned session like any other stream failure.
pub async fn ask<C: HttpClient>(
    api: &ApiClient<C>,
    questions: Vec<String>,
    updates: Option<&watch::Sender<AskSnapshot>>,
) -> MultiqResult<AskSession> {
    if questions.is_empty() {
        return Err(MultiqError::input(EMPTY_INPUT_MESSAGE));
    }

    let mut session = AskSession::new(questions);
    session.publish(updates);

    match api.ask_questions(session.questions()).await {
        Ok(bytes) => {
            session.drive(bytes, updates).await;
        }
        Err(err) => {
            session.fail(StreamError::ConnectionLost {
                message: err.to_string(),
            });
            session.finish();
            session.publish(updates);
        }
    }

    info!(
        answered = session.answers().answered_count(),
        questions = session.questions().len(),
        failed = session.error().is_some(),
        "Ask session finished"
    );
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn chunks(parts: &[&str]) -> impl Stream<Item = Result<Bytes, HttpError>> + Unpin {
        let items: Vec<_> = parts.iter().map(|p| Ok(Bytes::copy_from_slice(p.as_bytes()))).collect();
        stream::iter(items)
    }

    #[test]
    fn test_new_session_is_loading() {
        let session = AskSession::new(vec!["Q".to_string()]);
        assert!(session.is_loading());
        assert_eq!(session.progress(), 0.0);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn test_stream_error_event_sets_error() {
        let mut session = AskSession::new(vec!["Q".to_string()]);
        session.apply_line(r#"data: {"type":"error","error":"quota exceeded"}"#);
        assert_eq!(session.error(), Some("quota exceeded"));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn test_done_with_null_answer_finalizes_slot() {
        let mut session = AskSession::new(vec!["Q1".to_string()]);
        session.apply_line(r#"data: {"type":"progress","index":0,"total":1,"current":1,"question":"Q1"}"#);
        session.apply_line(r#"data: {"type":"token","index":0,"chunk":"par"}"#);
        let applied = session.apply_line(r#"data: {"type":"answer_done","index":0,"question":"Q1","answer":null}"#);

        assert_eq!(applied, Some(Applied::Changed));
        let slot = session.answers().get(0).unwrap();
        assert!(!slot.is_streaming);
        assert_eq!(slot.answer, "");
        assert_eq!(session.parse_stats().malformed, 0);
    }

    #[test]
    fn test_out_of_range_index_is_applied() {
        let mut session = AskSession::new(vec!["Q".to_string()]);
        let applied = session.apply(&AnswerEvent::AnswerDone {
            index: 4,
            question: "Q5".to_string(),
            answer: "A5".to_string(),
            error: false,
        });
        assert_eq!(applied, Applied::Changed);
        assert!(session.answers().contains(4));
        assert_eq!(session.progress(), 100.0);
    }

    #[tokio::test]
    async fn test_drive_publishes_final_snapshot() {
        let mut session = AskSession::new(vec!["Q1".to_string()]);
        let (tx, rx) = watch::channel(AskSnapshot::default());

        session
            .drive(
                chunks(&[
                    "data: {\"type\":\"progress\",\"index\":0,\"total\":1,\"current\":1,\"question\":\"Q1\"}\n",
                    "data: {\"type\":\"token\",\"index\":0,\"chunk\":\"Hi\"}\n",
                    "data: {\"type\":\"answer_done\",\"index\":0,\"question\":\"Q1\",\"answer\":\"Hi\",\"error\":false}\n",
                ]),
                Some(&tx),
            )
            .await;

        let snapshot = rx.borrow().clone();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.progress, 100.0);
        assert_eq!(snapshot.error, None);
        assert_eq!(snapshot.answers.get(0).unwrap().answer, "Hi");
        assert_eq!(session.parse_stats().events, 3);
    }

    #[tokio::test]
    async fn test_drive_publishes_once_per_chunk() {
        let mut body = String::from(
            "data: {\"type\":\"progress\",\"index\":0,\"total\":1,\"current\":1,\"question\":\"Q1\"}\n",
        );
        for _ in 0..50 {
            body.push_str("data: {\"type\":\"token\",\"index\":0,\"chunk\":\"x\"}\n");
        }
        let mut session = AskSession::new(vec!["Q1".to_string()]);
        let (tx, rx) = watch::channel(AskSnapshot::default());

        let done = "data: {\"type\":\"answer_done\",\"index\":0,\"question\":\"Q1\",\"answer\":\"done\"}\n";
        let published = session
            .drive(chunks(&[body.as_str(), ": keep-alive\n", done]), Some(&tx))
            .await;

        // Token chunk, done chunk, final snapshot; the keep-alive chunk changes nothing
        assert_eq!(published, 3);
        assert_eq!(session.parse_stats().events, 52);
        let snapshot = rx.borrow().clone();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.answers.get(0).unwrap().answer, "done");
    }

    #[tokio::test]
    async fn test_drive_without_receiver_publishes_nothing() {
        let mut session = AskSession::new(vec!["Q1".to_string()]);
        let published = session
            .drive(chunks(&["data: {\"type\":\"token\",\"index\":0,\"chunk\":\"x\"}\n"]), None)
            .await;
        assert_eq!(published, 0);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_drive_keeps_slots_on_transport_error() {
        let mut session = AskSession::new(vec!["Q1".to_string(), "Q2".to_string()]);
        let items = vec![
            Ok(Bytes::from_static(
                b"data: {\"type\":\"progress\",\"index\":0,\"total\":2,\"current\":1,\"question\":\"Q1\"}\ndata: {\"type\":\"token\",\"index\":0,\"chunk\":\"par\"}\n",
            )),
            Err(HttpError::Io("reset".to_string())),
        ];

        session.drive(stream::iter(items), None).await;

        assert_eq!(session.error(), Some(STREAM_FAILURE_MESSAGE));
        assert_eq!(session.progress(), 100.0);
        assert!(!session.is_loading());
        let slot = session.answers().get(0).unwrap();
        assert_eq!(slot.answer, "par");
        assert!(slot.is_streaming);
    }
}
