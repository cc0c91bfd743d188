pub(crate) mod error;
#[cfg(feature = "mock")]
mod mock;

pub use self::error::{Error, ErrorKind, Result};
#[cfg(feature = "mock")]
pub use self::mock::MockProbe;

use async_trait::async_trait;
use lectern_model::{CatalogEntry, Locator};

/// Identifies a package file and reads its metadata.
///
/// The probe is how the scan pass turns an opaque [`Locator`] into package
/// identity. A probe failure (missing file, corrupt archive, unsupported
/// format) is per-file and non-fatal: the scan pass skips that candidate and
/// carries on.
#[async_trait]
pub trait ArchiveProbe: Send + Sync {
    /// Read package identity and metadata from the file at `locator`.
    async fn probe(&self, locator: &Locator) -> Result<CatalogEntry>;
}
