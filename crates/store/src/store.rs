use crate::error::Result;
use async_trait::async_trait;
use lectern_model::{CatalogRecord, PackageId, PackageState};

/// One mutation within an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Insert the record, or replace the record with the same id.
    Upsert(CatalogRecord),
    /// Remove the record with this id. Deleting an absent id is a no-op, so
    /// batches stay idempotent under replay.
    Delete(PackageId),
}

/// Durable keyed storage for catalog records.
///
/// This is the single shared mutable resource of the catalog subsystem. A
/// reconciliation pass reads through [`get`](Self::get) /
/// [`query_by_state`](Self::query_by_state), accumulates its decisions, and
/// commits them in one [`write_batch`](Self::write_batch): a reader never
/// observes a partially-reconciled catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch a single record by package id.
    async fn get(&self, id: &PackageId) -> Result<Option<CatalogRecord>>;

    /// Insert or replace a single record.
    async fn upsert(&self, record: &CatalogRecord) -> Result<()>;

    /// Delete a single record by package id.
    async fn delete(&self, id: &PackageId) -> Result<()>;

    /// All records currently in the given state.
    async fn query_by_state(&self, state: PackageState) -> Result<Vec<CatalogRecord>>;

    /// Apply every mutation, or none of them.
    ///
    /// Implementations must guarantee full rollback on failure; a half
    /// applied batch would leave the catalog claiming states that neither
    /// source of truth ever asserted.
    async fn write_batch(&self, mutations: Vec<Mutation>) -> Result<()>;
}
