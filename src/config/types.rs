use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://github.com/google?tab=repositories";
pub const DEFAULT_PAGE_PARAM: &str = "page";
pub const DEFAULT_PAGES: [u32; 4] = [1, 2, 3, 4];
pub const DEFAULT_DELAY_MS: u64 = 2000;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_DATABASE_PATH: &str = "google_repos.db";

/// Main configuration structure for Repo-Tally
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Listing endpoint and pagination configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Listing URL, may already carry a query string
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Name of the query parameter selecting a page
    #[serde(rename = "page-param")]
    pub page_param: String,

    /// Page numbers to visit, in order
    pub pages: Vec<u32>,

    /// Pause between successfully stored pages (milliseconds)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,

    /// Value of the `User-Agent` header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl SourceConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_param: DEFAULT_PAGE_PARAM.to_string(),
            pages: DEFAULT_PAGES.to_vec(),
            delay_ms: DEFAULT_DELAY_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
        }
    }
}
