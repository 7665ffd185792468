//! Repo-Tally: an organization repository star ledger
//!
//! This crate walks a paginated repository listing, extracts the name,
//! primary language and star count of every repository on each page, and
//! keeps them in a single SQLite table that is rebuilt on every run.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Errors raised while setting up the HTTP side of a run
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_ingest, IngestReport, IngestSettings};
pub use storage::{RepositoryRecord, RepositoryStore, SqliteStore, StoredRepository};
