//! Catalog Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies which reconciliation pass failed.
///
/// Either kind means the pass committed nothing: store writes happen as one
/// atomic batch, and a failed batch rolls back wholesale. Per-file probe
/// failures never surface here; they are skipped and counted inside the
/// pass.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The remote-feed refresh pass failed against the store.
    #[display("remote catalog refresh failed")]
    Refresh,
    /// The local filesystem scan pass failed against the store.
    #[display("local library scan failed")]
    Scan,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Both passes are fire-to-completion against a transactional store;
        // nothing is left behind, so a later cycle can simply run again.
        true
    }
}
