//! Storage module for persisting repository records
//!
//! This module handles all database operations, including:
//! - Resetting the `repositories` table at the start of every run
//! - Inserting one page of records as a single transaction
//! - Reading every stored record back ordered by star count

mod schema;
mod sqlite;
mod traits;

pub use schema::{reset_schema, TABLE_NAME};
pub use sqlite::SqliteStore;
pub use traits::{RepositoryStore, StorageError, StorageResult};

use std::path::Path;

/// Language stored when a repository's container has no language element
pub const NO_LANGUAGE: &str = "No Language";

/// Language stored when a repository has no enclosing container at all
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Opens the store at `path` and resets it to an empty table
///
/// Any failure here is fatal to the run: nothing downstream can work
/// without the store.
pub fn open_fresh_store(path: &Path) -> StorageResult<SqliteStore> {
    let mut store = SqliteStore::open(path)?;
    store.reset()?;
    Ok(store)
}

/// A repository extracted from a listing page, not yet stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    pub name: String,
    pub language: String,
    pub stars: i64,
}

impl RepositoryRecord {
    pub fn new(name: impl Into<String>, language: impl Into<String>, stars: i64) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            stars,
        }
    }
}

/// A row read back from the `repositories` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRepository {
    pub id: i64,
    pub name: String,
    pub language: String,
    pub stars: i64,
}
