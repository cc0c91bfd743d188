//! Error types for the [`scan`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};

/// A scan error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for local scan operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A read or the batched write against the catalog store failed. Fatal
    /// for this pass; nothing was committed. Individual unreadable files are
    /// *not* this; those are skipped and counted.
    #[display("catalog store failure")]
    Store,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        true
    }
}
