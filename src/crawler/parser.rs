//! HTML parser for extracting repository records
//!
//! This module turns the markup of one listing page into repository records:
//! - Repository names (`itemprop` tokens `name` and `codeRepository`)
//! - The primary language inside the repository's list item
//! - The star count from the list item's stargazers link
//!
//! Extraction is per candidate: one malformed repository is skipped with a
//! reason and never affects the others on the page.

use crate::storage::{RepositoryRecord, NO_LANGUAGE, UNKNOWN_LANGUAGE};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Why a repository candidate produced no record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("malformed: {0}")]
    Malformed(String),
}

/// Outcome of extracting one repository candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Parsed(RepositoryRecord),
    Skipped(SkipReason),
}

/// Everything extracted from one listing page, in document order
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    pub outcomes: Vec<RecordOutcome>,
}

impl ExtractedPage {
    /// True when the page held no repository candidates at all
    ///
    /// This is the signal that the listing has run out of pages. A page
    /// whose candidates were all skipped is not empty.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of repository candidates found on the page
    pub fn candidate_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Parsed records, in document order
    pub fn records(&self) -> Vec<RepositoryRecord> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                RecordOutcome::Parsed(record) => Some(record.clone()),
                RecordOutcome::Skipped(_) => None,
            })
            .collect()
    }

    /// Reasons for every skipped candidate, in document order
    pub fn skipped(&self) -> Vec<&SkipReason> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                RecordOutcome::Skipped(reason) => Some(reason),
                RecordOutcome::Parsed(_) => None,
            })
            .collect()
    }
}

struct ListingSelectors {
    name: Selector,
    language: Selector,
    stargazers: Selector,
}

impl ListingSelectors {
    fn new() -> Option<Self> {
        Some(Self {
            name: Selector::parse(r#"a[itemprop~="name"][itemprop~="codeRepository"]"#).ok()?,
            language: Selector::parse(r#"span[itemprop~="programmingLanguage"]"#).ok()?,
            stargazers: Selector::parse(r#"a[href$="/stargazers"]"#).ok()?,
        })
    }
}

/// Parses one listing page and extracts every repository on it
///
/// # Extraction Rules
///
/// | Field | Source | Fallback |
/// |-------|--------|----------|
/// | name | trimmed text of the name element | stored as is, even if empty |
/// | container | nearest `<li>` ancestor | language `Unknown`, 0 stars |
/// | language | first `programmingLanguage` element in the container | `No Language` |
/// | stars | first link ending in `/stargazers`, commas removed | 0 |
///
/// # Example
///
/// ```
/// use repo_tally::crawler::extract_records;
///
/// let html = r#"<ul><li>
///     <a itemprop="name codeRepository" href="/acme/rocket">rocket</a>
///     <span itemprop="programmingLanguage">Rust</span>
///     <a href="/acme/rocket/stargazers">1,234</a>
/// </li></ul>"#;
/// let page = extract_records(html);
/// let records = page.records();
/// assert_eq!(records[0].name, "rocket");
/// assert_eq!(records[0].stars, 1234);
/// ```
pub fn extract_records(html: &str) -> ExtractedPage {
    let Some(selectors) = ListingSelectors::new() else {
        return ExtractedPage::default();
    };

    let document = Html::parse_document(html);
    let outcomes = document
        .select(&selectors.name)
        .map(|name_element| {
            match extract_record(name_element, &selectors) {
                Ok(record) => RecordOutcome::Parsed(record),
                Err(reason) => {
                    tracing::debug!("Skipping repository candidate: {}", reason);
                    RecordOutcome::Skipped(reason)
                }
            }
        })
        .collect();

    ExtractedPage { outcomes }
}

/// Extracts one repository from its name element
fn extract_record(
    name_element: ElementRef<'_>,
    selectors: &ListingSelectors,
) -> Result<RepositoryRecord, SkipReason> {
    let name = element_text(name_element);

    let Some(container) = find_container(name_element) else {
        return Ok(RepositoryRecord::new(name, UNKNOWN_LANGUAGE, 0));
    };

    let language = container
        .select(&selectors.language)
        .next()
        .map(element_text)
        .unwrap_or_else(|| NO_LANGUAGE.to_string());

    let stars = match container.select(&selectors.stargazers).next() {
        Some(star_link) => parse_star_count(&element_text(star_link))?,
        None => 0,
    };

    Ok(RepositoryRecord::new(name, language, stars))
}

/// Walks up to the nearest enclosing `<li>`
fn find_container(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "li")
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parses the displayed star count of a repository
///
/// Thousands separators are removed. Anything that is not a plain run of
/// digits counts as zero stars. A run of digits too large to store is
/// reported as malformed.
pub fn parse_star_count(text: &str) -> Result<i64, SkipReason> {
    let digits: String = text.trim().chars().filter(|&c| c != ',').collect();

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(0);
    }

    digits
        .parse::<i64>()
        .map_err(|_| SkipReason::Malformed(format!("star count '{}' out of range", text.trim())))
}
