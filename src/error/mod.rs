//! Error handling for multiq.
//!
//! - **Error categories** drive retry and messaging decisions
//! - **Domain errors** for the network collaborators and the answer stream
//! - **`MultiqError`** unifies them for the API client and the CLI
//!
//! Nothing in the decode/parse/reduce pipeline returns these errors: malformed
//! records are dropped where they are found, and stream failures are recorded
//! as state on the ask session. They surface only at the request boundaries.
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, timeout | Yes |
//! | Server | 5xx, `success: false` | Yes |
//! | Client | Undecodable payloads | No |
//! | User | Empty question list | No |
//! | Configuration | Bad `MULTIQ_*` values | No |

mod category;
mod multiq_error;
mod network;
mod result;
mod stream;

pub use category::ErrorCategory;
pub use multiq_error::MultiqError;
pub use network::NetworkError;
pub use result::MultiqResult;
pub use stream::{StreamError, STREAM_FAILURE_MESSAGE};
