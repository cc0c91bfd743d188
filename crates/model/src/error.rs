//! Model Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A model error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for model conversions.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A persisted state string did not match any known [`PackageState`](crate::PackageState).
    #[display("unrecognised package state: {_0}")]
    InvalidState(#[error(not(source))] String),
    /// A persisted snippet mode string did not match any known [`SnippetMode`](crate::SnippetMode).
    #[display("unrecognised snippet mode: {_0}")]
    InvalidSnippetMode(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
