//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the configured client identity and timeout
//! - GET requests for index and document pages
//! - Folding every failure into a single `Unavailable` result
//!
//! There is no retry here. Trying another location for the same document is
//! the coordinator's job.

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Page body decoded as UTF-8
        body: String,
    },

    /// The page could not be used; `cause` is for logs only
    Unavailable { cause: String },
}

impl FetchResult {
    fn unavailable(cause: impl Into<String>) -> Self {
        Self::Unavailable {
            cause: cause.into(),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total time allowed per request, body included
///
/// # Example
///
/// ```no_run
/// use folio::config::UserAgentConfig;
/// use folio::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.identity.as_str())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages, one request per call
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher with its own HTTP client
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config, timeout)?,
        })
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a URL and returns its body as text
    ///
    /// # Failure Mapping
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Connection error | Unavailable |
    /// | Timeout (headers or body) | Unavailable |
    /// | Non-2xx status | Unavailable |
    /// | Body is not valid UTF-8 | Unavailable |
    pub async fn fetch(&self, url: &Url) -> FetchResult {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return FetchResult::unavailable(describe_error(&e)),
        };

        let status = response.status();
        if !status.is_success() {
            return FetchResult::unavailable(format!("HTTP {}", status.as_u16()));
        }

        let final_url = response.url().to_string();

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return FetchResult::unavailable(describe_error(&e)),
        };

        match String::from_utf8(bytes.to_vec()) {
            Ok(body) => FetchResult::Success { final_url, body },
            Err(e) => FetchResult::unavailable(format!("Body is not valid UTF-8: {}", e)),
        }
    }
}

/// Classifies a client error for the log
fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    }
}
