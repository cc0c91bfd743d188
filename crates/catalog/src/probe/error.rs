//! Error types for the [`probe`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};
use lectern_model::Locator;

/// A probe error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for probe operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The file does not exist, cannot be opened, or is not a readable
    /// package archive.
    #[display("unreadable archive at {_0}")]
    Unreadable(#[error(not(source))] Locator),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
