//! SQLite-backed implementation of [`CatalogStore`].

use crate::db::Database;
use crate::error::{ErrorKind, Result};
use crate::models::RecordRow;
use crate::store::{CatalogStore, Mutation};
use async_trait::async_trait;
use exn::ResultExt;
use lectern_model::{CatalogRecord, PackageId, PackageState};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteArguments;

type Query = sqlx::query::Query<'static, sqlx::Sqlite, SqliteArguments<'static>>;

/// Durable catalog storage on top of a [`Database`] pool.
///
/// Single mutations run as their own implicit transaction;
/// [`write_batch`](CatalogStore::write_batch) wraps the whole batch in one
/// explicit transaction so a reconciliation pass commits all-or-nothing.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl From<&Database> for SqliteStore {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}

impl SqliteStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn upsert_query(record: &CatalogRecord) -> Result<Query> {
        if !record.is_consistent() {
            exn::bail!(ErrorKind::Constraint);
        }
        let row = RecordRow::try_from(record)?;
        // Bind order matches the column list in upsert_record.sql.
        Ok(sqlx::query(include_str!("../queries/upsert_record.sql"))
            .bind(row.id)
            .bind(row.title)
            .bind(row.description)
            .bind(row.languages)
            .bind(row.category)
            .bind(row.flavor)
            .bind(row.created_at)
            .bind(row.size)
            .bind(row.article_count)
            .bind(row.media_count)
            .bind(row.creator)
            .bind(row.publisher)
            .bind(row.download_url)
            .bind(row.favicon_url)
            .bind(row.favicon_data)
            .bind(row.has_details)
            .bind(row.has_pictures)
            .bind(row.has_videos)
            .bind(row.requires_external_runtime)
            .bind(row.state)
            .bind(row.locator))
    }

    fn delete_query(id: &PackageId) -> Query {
        sqlx::query(include_str!("../queries/delete_record.sql")).bind(id.as_str().to_string())
    }
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn get(&self, id: &PackageId) -> Result<Option<CatalogRecord>> {
        let row: Option<RecordRow> = sqlx::query_as(include_str!("../queries/get_record.sql"))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(CatalogRecord::try_from).transpose()
    }

    async fn upsert(&self, record: &CatalogRecord) -> Result<()> {
        Self::upsert_query(record)?.execute(&self.pool).await.or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    async fn delete(&self, id: &PackageId) -> Result<()> {
        Self::delete_query(id).execute(&self.pool).await.or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    async fn query_by_state(&self, state: PackageState) -> Result<Vec<CatalogRecord>> {
        let rows: Vec<RecordRow> = sqlx::query_as(include_str!("../queries/query_by_state.sql"))
            .bind(state.to_string())
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(CatalogRecord::try_from).collect()
    }

    async fn write_batch(&self, mutations: Vec<Mutation>) -> Result<()> {
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        for mutation in mutations {
            // Bailing here drops the transaction, which rolls back every
            // mutation already applied within it.
            let query = match &mutation {
                Mutation::Upsert(record) => Self::upsert_query(record)?,
                Mutation::Delete(id) => Self::delete_query(id),
            };
            query.execute(&mut *tx).await.or_raise(|| ErrorKind::Database)?;
        }
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        Ok(())
    }
}
