//! multiq - ask several questions at once and stream the answers
//!
//! The core is the answer-ingestion pipeline:
//!
//! ```text
//! bytes -> FrameDecoder -> lines -> EventParser -> events -> AnswerSet / ProgressTracker
//! ```
//!
//! driven by [`session::AskSession`], plus the follow-up chat state machine in
//! [`conversation`]. This library exposes modules for use in integration tests.

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod events;
pub mod models;
pub mod questions;
pub mod session;
pub mod sse;
pub mod state;
pub mod traits;
