//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests, including:
//! - Building the HTTP client with the browser-identifying user agent
//! - Building page-specific listing URLs
//! - GET requests for one listing page at a time
//! - Error classification (recoverable HTTP status vs fatal transport error)

use crate::config::SourceConfig;
use crate::TallyError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// URL that was requested
        url: String,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-success status; the page is skipped
    HttpError {
        /// URL that was requested
        url: String,
        /// The HTTP status code
        status_code: u16,
    },

    /// Transport failure (DNS, timeout, connection reset, truncated body)
    ///
    /// The ingestion loop stops when it sees one.
    NetworkError {
        /// URL that was requested
        url: String,
        /// Error description
        error: String,
    },
}

impl FetchResult {
    pub fn url(&self) -> &str {
        match self {
            Self::Success { url, .. }
            | Self::HttpError { url, .. }
            | Self::NetworkError { url, .. } => url,
        }
    }
}

/// Anything that can hand the ingestion loop the markup of one listing page
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Fetches listing page `page` (1-based)
    async fn fetch_page(&self, page: u32) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - Value sent as the `User-Agent` header on every request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the URL of one listing page
///
/// The page parameter is appended to whatever query the base URL already
/// carries, so `https://github.com/google?tab=repositories` becomes
/// `https://github.com/google?tab=repositories&page=2`.
pub fn page_url(base_url: &Url, page_param: &str, page: u32) -> Url {
    let mut url = base_url.clone();
    url.query_pairs_mut()
        .append_pair(page_param, &page.to_string());
    url
}

/// Fetches a URL with a single GET request
///
/// # Request Flow
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 2xx, body read | Success |
/// | Any other HTTP status | HttpError |
/// | Send failed (DNS, timeout, connect) | NetworkError |
/// | Body read failed | NetworkError |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError {
                url: url.to_string(),
                error,
            };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            url: url.to_string(),
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            url: url.to_string(),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            url: url.to_string(),
            error: e.to_string(),
        },
    }
}

/// Listing pages fetched over HTTP
pub struct HttpPageSource {
    client: Client,
    base_url: Url,
    page_param: String,
}

impl HttpPageSource {
    pub fn new(client: Client, base_url: Url, page_param: impl Into<String>) -> Self {
        Self {
            client,
            base_url,
            page_param: page_param.into(),
        }
    }

    /// Builds the client and parses the base URL from the source configuration
    pub fn from_config(config: &SourceConfig) -> Result<Self, TallyError> {
        let client = build_http_client(&config.user_agent)?;
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self::new(client, base_url, config.page_param.clone()))
    }

    pub fn page_url(&self, page: u32) -> Url {
        page_url(&self.base_url, &self.page_param, page)
    }
}

impl PageSource for HttpPageSource {
    async fn fetch_page(&self, page: u32) -> FetchResult {
        let url = self.page_url(page);
        fetch_url(&self.client, url.as_str()).await
    }
}
