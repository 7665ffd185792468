//! Crawler module for listing page fetching and processing
//!
//! This module contains the core ingestion logic, including:
//! - HTTP fetching of one listing page at a time
//! - HTML parsing and repository record extraction
//! - The page loop that stores each page as one batch

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{run_ingest, IngestReport, IngestSettings, PageOutcome, StopReason};
pub use fetcher::{build_http_client, fetch_url, page_url, FetchResult, HttpPageSource, PageSource};
pub use parser::{extract_records, parse_star_count, ExtractedPage, RecordOutcome, SkipReason};

use crate::config::Config;
use crate::storage::RepositoryStore;

/// Runs the ingestion loop against the live listing described by `config`
///
/// The store must already be reset; this only appends. A failure to build
/// the HTTP client is logged and reported as [`StopReason::SetupFailure`],
/// so the caller can still report and close the store.
pub async fn ingest(config: &Config, store: &mut dyn RepositoryStore) -> IngestReport {
    let source = match HttpPageSource::from_config(&config.source) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("Failed to set up HTTP client: {}", e);
            return IngestReport {
                pages: Vec::new(),
                stop: StopReason::SetupFailure {
                    error: e.to_string(),
                },
                inserted: 0,
            };
        }
    };
    let settings = IngestSettings {
        pages: config.source.pages.clone(),
        delay: config.source.delay(),
    };
    run_ingest(&source, store, &settings).await
}
