//! Trait seams for the external collaborators.
//!
//! - [`HttpClient`] - POST and streaming POST
//! - [`ChatBackend`] - follow-up chat request
//! - [`SummaryBackend`] - answer summary request

pub mod backend;
pub mod http;

pub use backend::{ChatBackend, SummaryBackend};
pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
