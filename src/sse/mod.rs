//! Answer-stream decoding.
//!
//! The answer stream is a chunked body of `data: <json>` lines:
//!
//! - [`FrameDecoder`] turns byte chunks into complete lines
//! - [`EventParser`] turns lines into [`AnswerEvent`]s, skipping anything else
//!
//! [`decode_lines`] and [`decode_events`] wrap both as lazy streams over a
//! chunk stream. All lines completed by a chunk are yielded before the next
//! chunk is polled.

mod decoder;
mod parser;

pub use decoder::FrameDecoder;
pub use parser::{parse_record, EventParser, ParseError, ParseStats, RECORD_PREFIX};

use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use std::collections::VecDeque;

use crate::events::AnswerEvent;
use crate::traits::HttpError;

struct LineState<S> {
    bytes: S,
    decoder: FrameDecoder,
    ready: VecDeque<String>,
    done: bool,
}

/// Lazily decode a chunk stream into lines.
///
/// A transport error is yielded once, after every line completed before it,
/// and ends the stream. The unterminated tail is dropped either way.
pub fn decode_lines<S>(bytes: S) -> impl Stream<Item = Result<String, HttpError>>
where
    S: Stream<Item = Result<Bytes, HttpError>> + Unpin,
{
    let state = LineState {
        bytes,
        decoder: FrameDecoder::new(),
        ready: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(line) = state.ready.pop_front() {
                return Some((Ok(line), state));
            }
            if state.done {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let lines = state.decoder.push(&chunk);
                    state.ready.extend(lines);
                }
                Some(Err(err)) => {
                    state.done = true;
                    state.decoder.finish();
                    return Some((Err(err), state));
                }
                None => {
                    state.done = true;
                    state.decoder.finish();
                }
            }
        }
    })
}

/// Lazily decode a chunk stream into answer events.
pub fn decode_events<S>(bytes: S) -> impl Stream<Item = Result<AnswerEvent, HttpError>>
where
    S: Stream<Item = Result<Bytes, HttpError>> + Unpin,
{
    let mut parser = EventParser::new();
    decode_lines(bytes).filter_map(move |item| {
        let event = match item {
            Ok(line) => parser.parse(&line).map(Ok),
            Err(err) => Some(Err(err)),
        };
        futures_util::future::ready(event)
    })
}
