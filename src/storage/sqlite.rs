//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the RepositoryStore trait.

use crate::storage::schema::reset_schema;
use crate::storage::traits::{RepositoryStore, StorageError, StorageResult};
use crate::storage::{RepositoryRecord, StoredRepository};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;

/// SQLite storage backend
///
/// Holds the one connection used for the whole run.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path`
    ///
    /// The table is not touched; call [`RepositoryStore::reset`] to start a run.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Opens a database file left by an earlier run
    ///
    /// Fails instead of creating the file when `path` does not exist.
    pub fn open_existing(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Creates an in-memory database with an empty table
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        reset_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Closes the connection, reporting any error SQLite raises while doing so
    pub fn close(self) -> StorageResult<()> {
        self.conn
            .close()
            .map_err(|(_, e)| StorageError::Sqlite(e))
    }
}

impl RepositoryStore for SqliteStore {
    fn reset(&mut self) -> StorageResult<()> {
        reset_schema(&self.conn)?;
        Ok(())
    }

    fn insert_batch(&mut self, records: &[RepositoryRecord]) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx
                .prepare_cached("INSERT INTO repositories (name, language, stars) VALUES (?1, ?2, ?3)")?;
            for record in records {
                if record.stars < 0 {
                    return Err(StorageError::Database(format!(
                        "negative star count {} for {}",
                        record.stars, record.name
                    )));
                }
                stmt.execute(params![record.name, record.language, record.stars])?;
            }
        }
        // Dropping `tx` without commit rolls the whole batch back.
        tx.commit()?;
        Ok(records.len())
    }

    fn list_by_stars(&self) -> StorageResult<Vec<StoredRepository>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, language, stars FROM repositories ORDER BY stars DESC, id ASC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(StoredRepository {
                    id: row.get(0)?,
                    name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    language: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    stars: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn count(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM repositories", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
