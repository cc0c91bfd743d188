//! In-memory catalog store for testing.

use crate::error::{ErrorKind, Result};
use crate::store::{CatalogStore, Mutation};
use async_trait::async_trait;
use lectern_model::{CatalogRecord, PackageId, PackageState};
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory [`CatalogStore`] for testing.
///
/// Records live in a `HashMap` behind an `RwLock`, so all trait methods can
/// operate on `&self` without external synchronisation. A whole batch is
/// applied under a single write guard, which makes `write_batch` trivially
/// atomic. [`fail_writes`](Self::fail_writes) injects a write failure so
/// callers can assert their no-partial-commit behaviour.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<PackageId, CatalogRecord>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create a store pre-populated with records.
    ///
    /// Panics if any record breaks the locator/state invariant. If test
    /// setup is wrong, then the test should not pass.
    pub fn with_records(records: impl IntoIterator<Item = CatalogRecord>) -> Self {
        let mut map = HashMap::new();
        for record in records {
            assert!(record.is_consistent(), "MemoryStore::with_records: inconsistent record {}", record.entry.id);
            map.insert(record.entry.id.clone(), record);
        }
        Self { records: RwLock::new(map), fail_writes: AtomicBool::new(false) }
    }

    /// Make every subsequent write (upsert, delete, batch) fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::Database);
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn get(&self, id: &PackageId) -> Result<Option<CatalogRecord>> {
        Ok(self.records.read().expect("lock poisoned").get(id).cloned())
    }

    async fn upsert(&self, record: &CatalogRecord) -> Result<()> {
        self.check_writable()?;
        if !record.is_consistent() {
            exn::bail!(ErrorKind::Constraint);
        }
        self.records.write().expect("lock poisoned").insert(record.entry.id.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, id: &PackageId) -> Result<()> {
        self.check_writable()?;
        self.records.write().expect("lock poisoned").remove(id);
        Ok(())
    }

    async fn query_by_state(&self, state: PackageState) -> Result<Vec<CatalogRecord>> {
        let mut records: Vec<CatalogRecord> =
            self.records.read().expect("lock poisoned").values().filter(|r| r.state == state).cloned().collect();
        // Deterministic order, matching the SQLite implementation.
        records.sort_by(|a, b| a.entry.id.cmp(&b.entry.id));
        Ok(records)
    }

    async fn write_batch(&self, mutations: Vec<Mutation>) -> Result<()> {
        self.check_writable()?;
        for mutation in &mutations {
            if let Mutation::Upsert(record) = mutation
                && !record.is_consistent()
            {
                exn::bail!(ErrorKind::Constraint);
            }
        }
        // Validation happened up front, so applying under one guard cannot
        // leave a partial batch behind.
        let mut records = self.records.write().expect("lock poisoned");
        for mutation in mutations {
            match mutation {
                Mutation::Upsert(record) => {
                    records.insert(record.entry.id.clone(), record);
                },
                Mutation::Delete(id) => {
                    records.remove(&id);
                },
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_model::{CatalogEntry, Locator, PackageFlags};
    use time::UtcDateTime;

    fn record(id: &str) -> CatalogRecord {
        CatalogRecord::remote(CatalogEntry {
            id: PackageId::from(id),
            title: id.to_string(),
            description: String::new(),
            languages: vec![],
            category: "other".to_string(),
            flavor: None,
            created_at: UtcDateTime::from_unix_timestamp(0).unwrap(),
            size: 0,
            article_count: 0,
            media_count: 0,
            creator: String::new(),
            publisher: String::new(),
            download_url: None,
            favicon_url: None,
            favicon_data: None,
            flags: PackageFlags::default(),
        })
    }

    #[tokio::test]
    async fn test_batch_applies_in_order() {
        let store = MemoryStore::default();
        store
            .write_batch(vec![
                Mutation::Upsert(record("a")),
                Mutation::Delete(PackageId::from("a")),
                Mutation::Upsert(record("b")),
            ])
            .await
            .unwrap();
        assert!(store.get(&PackageId::from("a")).await.unwrap().is_none());
        assert!(store.get(&PackageId::from("b")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_injected_failure_leaves_store_untouched() {
        let store = MemoryStore::with_records([record("a")]);
        store.fail_writes(true);
        assert!(store.write_batch(vec![Mutation::Delete(PackageId::from("a"))]).await.is_err());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_record_fails_whole_batch() {
        let store = MemoryStore::default();
        let mut broken = record("broken");
        broken.locator = Some(Locator::from("/archives/broken.zim"));
        let result = store.write_batch(vec![Mutation::Upsert(record("a")), Mutation::Upsert(broken)]).await;
        assert!(result.is_err());
        assert!(store.is_empty());
    }
}
