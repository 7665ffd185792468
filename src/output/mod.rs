//! Output module for the end-of-run report
//!
//! This module handles:
//! - Reading every stored repository back, most stars first
//! - Rendering the fixed-width console table and total line

mod report;

pub use report::{format_row, render_report, REPORT_RULE};

use crate::storage::{RepositoryStore, StorageResult};

/// Prints every stored repository, most stars first, and returns how many were printed
///
/// Read-only: the store is not modified.
pub fn print_report(store: &dyn RepositoryStore) -> StorageResult<usize> {
    let rows = store.list_by_stars()?;
    print!("{}", render_report(&rows));
    Ok(rows.len())
}
