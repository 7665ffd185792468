//! Fixed-width rendering of stored repositories

use crate::storage::StoredRepository;

/// Horizontal rule framing the report
pub const REPORT_RULE: &str = "==================================================";

/// Formats one row of the report
pub fn format_row(row: &StoredRepository) -> String {
    format!(
        "ID: {:<4} | Name: {:<35} | Lang: {:<15} | Stars: {}",
        row.id, row.name, row.language, row.stars
    )
}

/// Renders the full report: banner, one line per row, rule, total
///
/// Rows are rendered in the order given.
pub fn render_report(rows: &[StoredRepository]) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str(REPORT_RULE);
    out.push('\n');
    out.push_str("   Stored repositories (most stars first)\n");
    out.push_str(REPORT_RULE);
    out.push('\n');

    for row in rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }

    out.push_str(REPORT_RULE);
    out.push('\n');
    out.push_str(&format!("Total: {} repositories\n", rows.len()));
    out
}
