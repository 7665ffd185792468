//! Ingestion coordinator - the page-by-page fetch, extract, store loop
//!
//! This module contains the main loop that coordinates one run:
//! - Fetching each configured listing page in order
//! - Extracting repository records from the markup
//! - Committing each page's records as one batch
//! - Pausing between pages
//!
//! Failures are contained at the smallest scope they can be: a skipped
//! record never costs the page, an HTTP error never costs the run, and a
//! fatal error stops the loop but keeps every page committed before it.

use crate::crawler::fetcher::{FetchResult, PageSource};
use crate::crawler::parser::extract_records;
use crate::storage::RepositoryStore;
use std::time::Duration;

/// Settings for one ingestion run
#[derive(Debug, Clone)]
pub struct IngestSettings {
    /// Page numbers to visit, in order
    pub pages: Vec<u32>,

    /// Pause after each stored page before the next one is fetched
    pub delay: Duration,
}

/// What happened to one visited page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Records were extracted and committed
    Stored {
        page: u32,
        found: usize,
        inserted: usize,
        skipped: usize,
    },

    /// The server answered with a non-success status; nothing was stored
    HttpError { page: u32, status_code: u16 },

    /// No repository candidates on the page; the loop stopped here
    Empty { page: u32 },
}

impl PageOutcome {
    pub fn page(&self) -> u32 {
        match self {
            Self::Stored { page, .. } | Self::HttpError { page, .. } | Self::Empty { page } => {
                *page
            }
        }
    }
}

/// Why the loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Every configured page was visited
    Completed,

    /// A page yielded no candidates; later pages were not fetched
    EmptyPage(u32),

    /// A transport error while fetching; later pages were not fetched
    NetworkError { page: u32, error: String },

    /// Storing a page's batch failed; that page was rolled back
    StoreFailure { page: u32, error: String },

    /// The HTTP client could not be set up; no page was fetched
    SetupFailure { error: String },
}

impl StopReason {
    /// True for the stops that count as failures
    ///
    /// Running out of pages is a normal end of the listing.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::StoreFailure { .. } | Self::SetupFailure { .. }
        )
    }
}

/// Summary of one ingestion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// One entry per page that was fetched, in visiting order
    pub pages: Vec<PageOutcome>,

    pub stop: StopReason,

    /// Rows committed across all pages
    pub inserted: usize,
}

impl IngestReport {
    /// Page numbers that were fetched, in order
    pub fn visited_pages(&self) -> Vec<u32> {
        self.pages.iter().map(PageOutcome::page).collect()
    }
}

/// Runs the ingestion loop
///
/// # Per-page flow
///
/// | Step | Outcome | Action |
/// |------|---------|--------|
/// | fetch | HTTP error status | log, next page (no pause) |
/// | fetch | transport error | log, stop |
/// | extract | no candidates | log, stop |
/// | store | batch failed | rolled back, log, stop |
/// | store | committed | pause, next page |
///
/// Errors never escape: the returned report says how far the run got.
pub async fn run_ingest<S>(
    source: &S,
    store: &mut dyn RepositoryStore,
    settings: &IngestSettings,
) -> IngestReport
where
    S: PageSource,
{
    let mut outcomes = Vec::new();
    let mut inserted_total = 0;
    let mut stop = StopReason::Completed;

    for (index, &page) in settings.pages.iter().enumerate() {
        let body = match source.fetch_page(page).await {
            FetchResult::Success { url, body } => {
                tracing::info!("Page {}: fetched {}", page, url);
                body
            }
            FetchResult::HttpError { url, status_code } => {
                tracing::warn!("Page {}: {} returned HTTP {}, skipping", page, url, status_code);
                outcomes.push(PageOutcome::HttpError { page, status_code });
                continue;
            }
            FetchResult::NetworkError { url, error } => {
                tracing::error!("Page {}: request to {} failed: {}", page, url, error);
                stop = StopReason::NetworkError { page, error };
                break;
            }
        };

        let extracted = extract_records(&body);
        if extracted.is_empty() {
            tracing::warn!("Page {}: no repositories found, stopping", page);
            outcomes.push(PageOutcome::Empty { page });
            stop = StopReason::EmptyPage(page);
            break;
        }

        let records = extracted.records();
        let found = extracted.candidate_count();
        let skipped = found - records.len();
        tracing::info!(
            "Page {}: {} repositories found, storing {}",
            page,
            found,
            records.len()
        );

        let inserted = match store.insert_batch(&records) {
            Ok(inserted) => inserted,
            Err(e) => {
                tracing::error!("Page {}: failed to store records: {}", page, e);
                stop = StopReason::StoreFailure {
                    page,
                    error: e.to_string(),
                };
                break;
            }
        };

        inserted_total += inserted;
        outcomes.push(PageOutcome::Stored {
            page,
            found,
            inserted,
            skipped,
        });

        let is_last = index + 1 == settings.pages.len();
        if !is_last && !settings.delay.is_zero() {
            tracing::debug!("Waiting {:?} before the next page", settings.delay);
            tokio::time::sleep(settings.delay).await;
        }
    }

    match &stop {
        StopReason::Completed => {
            tracing::info!("All {} pages processed", settings.pages.len())
        }
        StopReason::EmptyPage(page) => {
            tracing::info!("Listing ended at page {}", page)
        }
        StopReason::NetworkError { .. }
        | StopReason::StoreFailure { .. }
        | StopReason::SetupFailure { .. } => {
            tracing::warn!("Ingestion stopped early; keeping pages committed so far")
        }
    }

    IngestReport {
        pages: outcomes,
        stop,
        inserted: inserted_total,
    }
}
