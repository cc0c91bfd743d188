//! The persisted catalog record and its state machine.

use crate::entry::CatalogEntry;
use crate::error::{ErrorKind, Result};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A durable, restart-safe reference to a package's on-disk location.
///
/// Deliberately opaque: on one platform this may be a plain path, on another
/// a security-scoped bookmark blob. The catalog only ever stores and returns
/// it, never interprets it.
#[derive(Debug, Display, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<String> for Locator {
    fn from(locator: String) -> Self {
        Self(locator)
    }
}
impl From<&str> for Locator {
    fn from(locator: &str) -> Self {
        Self(locator.to_string())
    }
}

/// Lifecycle state of a catalog record.
///
/// The reconcilers own only the `Remote` ⇄ `OnDevice` edges (plus deletion);
/// `Queued`, `Downloading`, `Paused`, `Error` and `Retained` belong to the
/// download manager and user actions, and no reconciliation pass ever
/// transitions a record *into* one of them.
#[derive(Debug, Display, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageState {
    #[display("remote")]
    Remote,
    #[display("queued")]
    Queued,
    #[display("downloading")]
    Downloading,
    #[display("paused")]
    Paused,
    #[display("error")]
    Error,
    #[display("on-device")]
    OnDevice,
    #[display("retained")]
    Retained,
}

impl FromStr for PackageState {
    type Err = crate::error::Error;
    fn from_str(value: &str) -> Result<Self> {
        Ok(match value {
            "remote" => Self::Remote,
            "queued" => Self::Queued,
            "downloading" => Self::Downloading,
            "paused" => Self::Paused,
            "error" => Self::Error,
            "on-device" => Self::OnDevice,
            "retained" => Self::Retained,
            other => return Err(exn::Exn::from(ErrorKind::InvalidState(other.to_string()))),
        })
    }
}

/// A persisted catalog record: immutable package metadata plus the mutable
/// bookkeeping the reconcilers and the download manager care about.
///
/// # Invariants
///
/// - `entry.id` is the primary key and stable across all reconciliation passes.
/// - `locator` is `Some` iff `state == OnDevice` (also enforced by a CHECK
///   constraint in the SQLite store).
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord {
    pub entry: CatalogEntry,
    pub state: PackageState,
    pub locator: Option<Locator>,
}

impl CatalogRecord {
    /// A record for a package known only from the remote feed.
    pub fn remote(entry: CatalogEntry) -> Self {
        Self { entry, state: PackageState::Remote, locator: None }
    }

    /// A record for a package physically present on this device.
    pub fn on_device(entry: CatalogEntry, locator: Locator) -> Self {
        Self { entry, state: PackageState::OnDevice, locator: Some(locator) }
    }

    /// Mark the package as physically present.
    ///
    /// An already-set locator is kept: the existing one is the reference the
    /// rest of the application already holds, and the probe's candidate points
    /// at the same file.
    pub fn promote(&mut self, locator: Locator) {
        self.state = PackageState::OnDevice;
        if self.locator.is_none() {
            self.locator = Some(locator);
        }
    }

    /// Mark the package as known-but-not-present. Clears the locator, which
    /// is meaningless without a file behind it.
    pub fn demote(&mut self) {
        self.state = PackageState::Remote;
        self.locator = None;
    }

    /// Overwrite the metadata from a fresh feed entry, leaving state and
    /// locator untouched.
    pub fn apply_metadata(&mut self, entry: CatalogEntry) {
        debug_assert_eq!(self.entry.id, entry.id);
        self.entry = entry;
    }

    /// Whether the locator/state invariant holds.
    pub fn is_consistent(&self) -> bool {
        self.locator.is_some() == (self.state == PackageState::OnDevice)
    }
}

/// Counts reported by one reconciliation pass.
///
/// Observability only: callers may log it or use [`has_changes`](Self::has_changes)
/// to decide whether a view needs refreshing, but nothing inside the
/// reconcilers branches on it.
#[derive(Debug, Display, Default, Clone, Copy, PartialEq, Eq)]
#[display("addition: {additions}, update: {updates}, deletion: {deletions}")]
pub struct ReconcileOutcome {
    pub additions: u64,
    pub updates: u64,
    pub deletions: u64,
    /// Candidate files the probe could not read; skipped, never fatal.
    pub skipped: u64,
}

impl ReconcileOutcome {
    /// `true` if the pass mutated the catalog at all.
    pub fn has_changes(&self) -> bool {
        self.additions > 0 || self.updates > 0 || self.deletions > 0
    }
}
