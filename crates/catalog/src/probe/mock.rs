//! In-memory archive probe for testing.

use super::{ArchiveProbe, ErrorKind, Result};
use async_trait::async_trait;
use lectern_model::{CatalogEntry, Locator};
use std::collections::HashMap;

/// In-memory [`ArchiveProbe`] for testing.
///
/// Maps known locators to the metadata a real probe would have read from the
/// file; any other locator fails with [`ErrorKind::Unreadable`], which is
/// exactly how the scan pass sees a corrupt or vanished file.
#[derive(Debug, Default)]
pub struct MockProbe {
    packages: HashMap<Locator, CatalogEntry>,
}

impl MockProbe {
    /// Create a probe that recognises the given locators.
    pub fn with_packages(packages: impl IntoIterator<Item = (Locator, CatalogEntry)>) -> Self {
        Self { packages: packages.into_iter().collect() }
    }
}

#[async_trait]
impl ArchiveProbe for MockProbe {
    async fn probe(&self, locator: &Locator) -> Result<CatalogEntry> {
        self.packages
            .get(locator)
            .cloned()
            .ok_or_else(|| exn::Exn::from(ErrorKind::Unreadable(locator.clone())))
    }
}
