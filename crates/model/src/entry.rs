//! Immutable package metadata as parsed from a remote feed or probed from a
//! file on disk.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use time::UtcDateTime;

/// Opaque, stable identifier of a content package.
///
/// The id is assigned by whoever published the package and survives every
/// reconciliation pass; it is the primary key of the persisted catalog.
#[derive(Debug, Display, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<String> for PackageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
impl From<&str> for PackageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Capability flags carried by a package.
///
/// `requires_external_runtime` marks packages that cannot be rendered by
/// this application at all; callers filter those out of a feed *before*
/// handing it to the reconciler.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFlags {
    pub has_details: bool,
    pub has_pictures: bool,
    pub has_videos: bool,
    pub requires_external_runtime: bool,
}

/// Immutable metadata describing one content package.
///
/// Parsed from a feed entry or returned by an archive probe. The persisted
/// [`CatalogRecord`](crate::CatalogRecord) wraps one of these together with
/// the mutable bookkeeping fields (state, locator).
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: PackageId,
    pub title: String,
    pub description: String,
    /// ISO 639 codes, most significant first.
    pub languages: Vec<String>,
    pub category: String,
    pub flavor: Option<String>,
    pub created_at: UtcDateTime,
    pub size: u64,
    pub article_count: u64,
    pub media_count: u64,
    pub creator: String,
    pub publisher: String,
    /// Absent for packages that were side-loaded and never published.
    pub download_url: Option<String>,
    pub favicon_url: Option<String>,
    pub favicon_data: Option<Vec<u8>>,
    pub flags: PackageFlags,
}
