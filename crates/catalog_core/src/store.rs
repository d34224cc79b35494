//! Composition root: turns configuration into a repository handle.
//!
//! # Invariants
//! - The backend is chosen once here; services only see `CatalogRepository`.
//! - A SQLite store always holds a fully migrated connection.

use crate::config::{BackendKind, CatalogConfig, SQLITE_MEMORY_PATH};
use crate::db::{open_db, open_db_in_memory};
use crate::repo::contract::{CatalogRepository, RepoResult};
use crate::repo::memory::InMemoryCatalogRepository;
use crate::repo::sqlite::SqliteCatalogRepository;
use log::info;
use rusqlite::Connection;

/// Owned storage for the configured backend.
pub enum CatalogStore {
    Memory(InMemoryCatalogRepository),
    Sqlite(Connection),
}

impl CatalogStore {
    /// Opens the backend described by `config`.
    pub fn open(config: &CatalogConfig) -> RepoResult<Self> {
        let store = match &config.backend {
            BackendKind::Memory => Self::Memory(InMemoryCatalogRepository::new()),
            BackendKind::Sqlite { db_path } if db_path.as_os_str() == SQLITE_MEMORY_PATH => {
                Self::Sqlite(open_db_in_memory()?)
            }
            BackendKind::Sqlite { db_path } => Self::Sqlite(open_db(db_path)?),
        };
        info!(
            "event=store_open module=store status=ok backend={}",
            config.backend.name()
        );
        Ok(store)
    }

    /// Borrows a repository handle over this store.
    pub fn repository(&self) -> RepoResult<Box<dyn CatalogRepository + '_>> {
        match self {
            Self::Memory(repo) => Ok(Box::new(repo.clone())),
            Self::Sqlite(conn) => Ok(Box::new(SqliteCatalogRepository::try_new(conn)?)),
        }
    }
}
