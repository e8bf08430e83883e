//! Concrete implementations of the trait seams in `crate::traits`.
//!
//! - [`ReqwestHttpClient`] - production HTTP client
//! - [`mock`] - test doubles

pub mod mock;
pub mod reqwest_http;

pub use mock::{MockHttpClient, MockResponse, RecordedRequest, Scripted, ScriptedBackend};
pub use reqwest_http::ReqwestHttpClient;
