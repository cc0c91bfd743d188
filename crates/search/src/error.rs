//! Search Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Cancellation is deliberately *not* an error kind: a superseded query is
//! the caller getting what it asked for, and is reported as
//! [`SearchOutcome::Cancelled`](crate::orchestrator::SearchOutcome) instead.
//! Per-hit extraction failures never surface here either: a hit whose
//! snippet could not be extracted simply keeps `snippet: None`.

use derive_more::{Display, Error};

/// A search error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The spawned search task died before reporting an outcome.
    #[display("search task failed")]
    Task,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        true
    }
}
