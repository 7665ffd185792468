//! Database schema definitions
//!
//! The single `repositories` table is dropped and recreated on every run;
//! there is no migration path.

/// Name of the only table in the database
pub const TABLE_NAME: &str = "repositories";

/// SQL that discards any previous table and creates an empty one
pub const RESET_SQL: &str = r#"
DROP TABLE IF EXISTS repositories;

CREATE TABLE repositories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    language TEXT,
    stars INTEGER
);
"#;

/// Drops and recreates the `repositories` table
///
/// Safe to call any number of times.
pub fn reset_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(RESET_SQL)
}
