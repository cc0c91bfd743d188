//! Persisted catalog storage.
//!
//! The [`CatalogStore`] trait is the contract the reconcilers in
//! `lectern-catalog` speak: keyed CRUD over [`CatalogRecord`]s plus an atomic
//! batched write. [`SqliteStore`] is the production implementation;
//! [`MemoryStore`] (behind the `mock` feature) backs tests without touching
//! the filesystem.
//!
//! [`CatalogRecord`]: lectern_model::CatalogRecord

pub mod error;

mod db;
#[cfg(feature = "mock")]
mod memory;
mod models;
mod sqlite;
mod store;

pub use crate::db::Database;
#[cfg(feature = "mock")]
pub use crate::memory::MemoryStore;
pub use crate::sqlite::SqliteStore;
pub use crate::store::{CatalogStore, Mutation};
