//! Error types for the [`render`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};

/// A render error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The package or content path does not exist in the archive.
    #[display("content not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// The content exists but could not be decoded or excerpted.
    #[display("content could not be rendered")]
    Render,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
