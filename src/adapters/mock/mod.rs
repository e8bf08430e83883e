//! Test doubles for the trait seams.
//!
//! - [`MockHttpClient`] - configurable HTTP responses and chunk streams
//! - [`ScriptedBackend`] - chat/summary backend driven by a script

pub mod backend;
pub mod http;

pub use backend::{Scripted, ScriptedBackend};
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
