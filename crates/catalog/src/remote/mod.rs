//! Remote-feed reconciliation.

pub(crate) mod error;

use crate::error::{ErrorKind as CatalogErrorKind, Result as CatalogResult};
use crate::remote::error::{ErrorKind, Result as RefreshResult};
use exn::ResultExt;
use lectern_model::{CatalogEntry, CatalogRecord, PackageId, PackageState, ReconcileOutcome};
use lectern_store::{CatalogStore, Mutation};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Diffs a freshly parsed remote feed against the Remote-state records in
/// the catalog store.
///
/// Only records in `Remote` state are this pass's to touch: a package the
/// user has downloaded, retained, or is actively downloading survives a feed
/// refresh even if it vanishes from the feed entirely. All mutations commit
/// as one atomic batch.
///
/// Passes are single-flight: a second [`reconcile`](Self::reconcile) call
/// queues behind the one in flight instead of interleaving writes.
pub struct RemoteReconciler {
    store: Arc<dyn CatalogStore>,
    pass: Mutex<()>,
}

impl RemoteReconciler {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store, pass: Mutex::new(()) }
    }

    /// Run one refresh pass over `feed`.
    ///
    /// Feed entries must have unique ids (the upstream parser deduplicates).
    /// With `update_existing`, metadata of already-known packages is
    /// overwritten in place; state and locator are never touched, whatever
    /// state the record is in.
    pub async fn reconcile(&self, feed: Vec<CatalogEntry>, update_existing: bool) -> CatalogResult<ReconcileOutcome> {
        let _pass = self.pass.lock().await;
        let outcome = self.reconcile_inner(feed, update_existing).await.or_raise(|| CatalogErrorKind::Refresh)?;
        tracing::info!(%outcome, "remote refresh finished");
        Ok(outcome)
    }

    async fn reconcile_inner(&self, feed: Vec<CatalogEntry>, update_existing: bool) -> RefreshResult<ReconcileOutcome> {
        let feed_ids: HashSet<PackageId> = feed.iter().map(|entry| entry.id.clone()).collect();
        let mut outcome = ReconcileOutcome::default();
        let mut mutations = Vec::new();

        // Remote records that fell out of the feed are stale: nothing points
        // at them and nothing can re-fetch them through this catalog.
        let remote = self.store.query_by_state(PackageState::Remote).await.or_raise(|| ErrorKind::Store)?;
        for record in remote {
            if !feed_ids.contains(&record.entry.id) {
                mutations.push(Mutation::Delete(record.entry.id));
                outcome.deletions += 1;
            }
        }

        for entry in feed {
            match self.store.get(&entry.id).await.or_raise(|| ErrorKind::Store)? {
                Some(mut record) if update_existing => {
                    record.apply_metadata(entry);
                    mutations.push(Mutation::Upsert(record));
                    outcome.updates += 1;
                },
                Some(_) => {},
                None => {
                    mutations.push(Mutation::Upsert(CatalogRecord::remote(entry)));
                    outcome.additions += 1;
                },
            }
        }

        self.store.write_batch(mutations).await.or_raise(|| ErrorKind::Store)?;
        Ok(outcome)
    }
}
