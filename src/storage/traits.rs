//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{RepositoryRecord, StoredRepository};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The ingestion loop and the reporter receive the store through this trait,
/// so they can run against an in-memory database in tests.
pub trait RepositoryStore {
    /// Drops and recreates the table, leaving it empty
    fn reset(&mut self) -> StorageResult<()>;

    /// Inserts every record as a new row inside one transaction
    ///
    /// Either all records of the batch are committed or none are.
    /// Returns the number of rows inserted.
    fn insert_batch(&mut self, records: &[RepositoryRecord]) -> StorageResult<usize>;

    /// Reads every stored row, highest star count first
    ///
    /// Rows with equal star counts come back in insertion order.
    fn list_by_stars(&self) -> StorageResult<Vec<StoredRepository>>;

    /// Counts the stored rows
    fn count(&self) -> StorageResult<u64>;
}
