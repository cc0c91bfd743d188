//! Catalog reconciliation.
//!
//! Two independent, partially-overlapping sources of truth feed the persisted
//! catalog: the remote feed (what could be downloaded) and the local
//! filesystem (what is actually here). [`RemoteReconciler`] and
//! [`ScanReconciler`] each diff their source against the records whose state
//! they own and commit the difference as one atomic batch, so the two may run
//! concurrently without coordination beyond the store's own write atomicity.

pub mod error;
pub mod probe;
pub mod remote;
pub mod scan;

pub use crate::probe::ArchiveProbe;
pub use crate::remote::RemoteReconciler;
pub use crate::scan::ScanReconciler;
