//! Result type alias for multiq operations.

use super::multiq_error::MultiqError;

/// Type alias for Results using [`MultiqError`].
pub type MultiqResult<T> = Result<T, MultiqError>;
