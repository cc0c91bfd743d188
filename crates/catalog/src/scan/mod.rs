//! Local filesystem reconciliation.

pub(crate) mod error;

use crate::error::{ErrorKind as CatalogErrorKind, Result as CatalogResult};
use crate::probe::ArchiveProbe;
use crate::scan::error::{ErrorKind, Result as ScanResult};
use exn::ResultExt;
use lectern_model::{CatalogEntry, CatalogRecord, Locator, PackageId, PackageState, ReconcileOutcome};
use lectern_store::{CatalogStore, Mutation};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Diffs the packages physically present on disk against the OnDevice-state
/// records in the catalog store.
///
/// Candidate locations come from whatever discovery the platform offers
/// (directory listing, open-in-place bookmarks); each is probed for package
/// identity. Unreadable candidates are skipped and counted, never fatal.
/// OnDevice records whose file has vanished are demoted back to `Remote`
/// when they can be re-downloaded, and deleted outright when they cannot:
/// a record with no file and no download URL points at nothing.
///
/// Passes are single-flight, and all mutations commit as one atomic batch.
pub struct ScanReconciler {
    store: Arc<dyn CatalogStore>,
    probe: Arc<dyn ArchiveProbe>,
    pass: Mutex<()>,
}

impl ScanReconciler {
    pub fn new(store: Arc<dyn CatalogStore>, probe: Arc<dyn ArchiveProbe>) -> Self {
        Self { store, probe, pass: Mutex::new(()) }
    }

    /// Run one scan pass over `candidates`.
    pub async fn reconcile(&self, candidates: &[Locator]) -> CatalogResult<ReconcileOutcome> {
        let _pass = self.pass.lock().await;
        let outcome = self.reconcile_inner(candidates).await.or_raise(|| CatalogErrorKind::Scan)?;
        tracing::info!(%outcome, skipped = outcome.skipped, "local scan finished");
        Ok(outcome)
    }

    async fn reconcile_inner(&self, candidates: &[Locator]) -> ScanResult<ReconcileOutcome> {
        let mut outcome = ReconcileOutcome::default();

        // Probe every candidate; first locator wins when two files claim the
        // same package id.
        let mut found: HashMap<PackageId, (Locator, CatalogEntry)> = HashMap::new();
        for locator in candidates {
            match self.probe.probe(locator).await {
                Ok(entry) => {
                    found.entry(entry.id.clone()).or_insert_with(|| (locator.clone(), entry));
                },
                Err(error) => {
                    tracing::warn!(%locator, %error, "skipping unreadable package file");
                    outcome.skipped += 1;
                },
            }
        }

        let mut mutations = Vec::new();
        for (id, (locator, entry)) in &found {
            match self.store.get(id).await.or_raise(|| ErrorKind::Store)? {
                Some(mut record) => {
                    let before = (record.state, record.locator.clone());
                    record.promote(locator.clone());
                    // Only write when the promotion actually changed the
                    // record; re-scanning a stable library is a no-op.
                    if (record.state, record.locator.clone()) != before {
                        mutations.push(Mutation::Upsert(record));
                        outcome.updates += 1;
                    }
                },
                None => {
                    mutations.push(Mutation::Upsert(CatalogRecord::on_device(entry.clone(), locator.clone())));
                    outcome.additions += 1;
                },
            }
        }

        // Demote or prune OnDevice records whose file was not seen this pass.
        let on_device = self.store.query_by_state(PackageState::OnDevice).await.or_raise(|| ErrorKind::Store)?;
        for mut record in on_device {
            if found.contains_key(&record.entry.id) {
                continue;
            }
            if record.entry.download_url.is_some() {
                record.demote();
                mutations.push(Mutation::Upsert(record));
                outcome.updates += 1;
            } else {
                mutations.push(Mutation::Delete(record.entry.id));
                outcome.deletions += 1;
            }
        }

        self.store.write_batch(mutations).await.or_raise(|| ErrorKind::Store)?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::MockProbe;
    use lectern_model::PackageFlags;
    use lectern_store::MemoryStore;
    use time::UtcDateTime;

    fn entry(id: &str, download_url: Option<&str>) -> CatalogEntry {
        CatalogEntry {
            id: PackageId::from(id),
            title: id.to_string(),
            description: String::new(),
            languages: vec!["en".to_string()],
            category: "other".to_string(),
            flavor: None,
            created_at: UtcDateTime::from_unix_timestamp(1_577_836_800).unwrap(),
            size: 512,
            article_count: 3,
            media_count: 0,
            creator: "creator".to_string(),
            publisher: "publisher".to_string(),
            download_url: download_url.map(str::to_string),
            favicon_url: None,
            favicon_data: None,
            flags: PackageFlags::default(),
        }
    }

    fn locator(id: &str) -> Locator {
        Locator::from(format!("/archives/{id}.zim"))
    }

    #[tokio::test]
    async fn test_discovered_files_are_added_on_device() {
        let store = Arc::new(MemoryStore::default());
        let probe = Arc::new(MockProbe::with_packages([(locator("p"), entry("p", None))]));
        let reconciler = ScanReconciler::new(store.clone(), probe);
        let outcome = reconciler.reconcile(&[locator("p")]).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome { additions: 1, updates: 0, deletions: 0, skipped: 0 });
        let record = store.get(&PackageId::from("p")).await.unwrap().unwrap();
        assert_eq!(record.state, PackageState::OnDevice);
        assert_eq!(record.locator, Some(locator("p")));
    }

    #[tokio::test]
    async fn test_known_remote_record_is_promoted() {
        let store = Arc::new(MemoryStore::with_records([CatalogRecord::remote(entry("p", Some("https://example.org/p.zim")))]));
        let probe = Arc::new(MockProbe::with_packages([(locator("p"), entry("p", Some("https://example.org/p.zim")))]));
        let outcome = ScanReconciler::new(store.clone(), probe).reconcile(&[locator("p")]).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome { additions: 0, updates: 1, deletions: 0, skipped: 0 });
        let record = store.get(&PackageId::from("p")).await.unwrap().unwrap();
        assert_eq!(record.state, PackageState::OnDevice);
        assert_eq!(record.locator, Some(locator("p")));
    }

    #[tokio::test]
    async fn test_missing_file_with_download_url_is_demoted() {
        let store = Arc::new(MemoryStore::with_records([CatalogRecord::on_device(
            entry("p", Some("https://example.org/p.zim")),
            locator("p"),
        )]));
        let probe = Arc::new(MockProbe::default());
        let outcome = ScanReconciler::new(store.clone(), probe).reconcile(&[]).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome { additions: 0, updates: 1, deletions: 0, skipped: 0 });
        let record = store.get(&PackageId::from("p")).await.unwrap().unwrap();
        assert_eq!(record.state, PackageState::Remote);
        assert!(record.locator.is_none());
    }

    #[tokio::test]
    async fn test_missing_file_without_download_url_is_deleted() {
        let store = Arc::new(MemoryStore::with_records([CatalogRecord::on_device(entry("q", None), locator("q"))]));
        let probe = Arc::new(MockProbe::default());
        let outcome = ScanReconciler::new(store.clone(), probe).reconcile(&[]).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome { additions: 0, updates: 0, deletions: 1, skipped: 0 });
        assert!(store.get(&PackageId::from("q")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_candidates_are_skipped_not_fatal() {
        let store = Arc::new(MemoryStore::default());
        let probe = Arc::new(MockProbe::with_packages([(locator("good"), entry("good", None))]));
        let reconciler = ScanReconciler::new(store.clone(), probe);
        let outcome = reconciler.reconcile(&[locator("corrupt"), locator("good")]).await.unwrap();
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.additions, 1);
        assert!(store.get(&PackageId::from("good")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rescan_of_stable_library_is_a_no_op() {
        let store = Arc::new(MemoryStore::with_records([CatalogRecord::on_device(entry("p", None), locator("p"))]));
        let probe = Arc::new(MockProbe::with_packages([(locator("p"), entry("p", None))]));
        let outcome = ScanReconciler::new(store.clone(), probe).reconcile(&[locator("p")]).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::default());
    }

    #[tokio::test]
    async fn test_store_failure_aborts_pass_without_partial_state() {
        let store = Arc::new(MemoryStore::with_records([CatalogRecord::on_device(entry("q", None), locator("q"))]));
        let probe = Arc::new(MockProbe::with_packages([(locator("new"), entry("new", None))]));
        store.fail_writes(true);
        let result = ScanReconciler::new(store.clone(), probe).reconcile(&[locator("new")]).await;
        assert!(result.is_err());
        // The prune of q and the addition of new both rolled back.
        assert!(store.get(&PackageId::from("q")).await.unwrap().is_some());
        assert!(store.get(&PackageId::from("new")).await.unwrap().is_none());
    }
}
