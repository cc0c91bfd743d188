//! Shared data model for the lectern catalog and search subsystems.
//!
//! Everything in here is plain data: identifiers, the immutable package
//! metadata parsed from a feed or probed from a file, the mutable persisted
//! record wrapping it, and the search hit/result types. Behaviour lives in
//! the `lectern-catalog` and `lectern-search` crates.

pub mod entry;
pub mod error;
pub mod record;
pub mod search;

pub use crate::entry::{CatalogEntry, PackageFlags, PackageId};
pub use crate::record::{CatalogRecord, Locator, PackageState, ReconcileOutcome};
pub use crate::search::{ScoredResult, SearchHit, SnippetMode};
