//! Configuration module for Repo-Tally
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; a missing file section falls back to the built-in
//! listing (the `google` organization, pages 1 through 4).
//!
//! # Example
//!
//! ```no_run
//! use repo_tally::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tally.toml")).unwrap();
//! println!("Pages to visit: {:?}", config.source.pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, OutputConfig, SourceConfig, DEFAULT_BASE_URL, DEFAULT_DATABASE_PATH,
    DEFAULT_DELAY_MS, DEFAULT_PAGES, DEFAULT_PAGE_PARAM, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
