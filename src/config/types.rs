use serde::Deserialize;

/// Client identity sent when none is configured. Some hosts refuse requests
/// without a browser-like user agent.
pub const DEFAULT_IDENTITY: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Main configuration structure for Folio
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    pub output: OutputConfig,
    #[serde(rename = "target", default)]
    pub targets: Vec<TargetEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Site root; the index page for link discovery and the base for relative links
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Minimum time between the start of consecutive requests (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Total time allowed for a single request (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extracted text shorter than this many characters is rejected
    #[serde(rename = "min-accept-length", default = "default_min_accept_length")]
    pub min_accept_length: usize,

    /// Whether to build the work list from the index page
    #[serde(default = "default_true")]
    pub discover: bool,
}

/// Outbound client identity
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_identity")]
    pub identity: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            identity: default_identity(),
        }
    }
}

/// Thresholds for the structural extractor
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Fewer structural blocks than this falls back to plain tag stripping
    #[serde(rename = "min-blocks", default = "default_min_blocks")]
    pub min_blocks: usize,

    /// Blocks of this many characters or fewer are dropped
    #[serde(rename = "min-block-chars", default = "default_min_block_chars")]
    pub min_block_chars: usize,

    /// Replace runs of non-ASCII characters with a space
    #[serde(rename = "ascii-only", default)]
    pub ascii_only: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_blocks: default_min_blocks(),
            min_block_chars: default_min_block_chars(),
            ascii_only: false,
        }
    }
}

/// Link discovery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// Regexes matched against href values, applied in order
    #[serde(rename = "link-patterns", default = "default_link_patterns")]
    pub link_patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            link_patterns: default_link_patterns(),
        }
    }
}

/// Where extracted documents go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `<identifier>.txt` file per document
    #[default]
    Text,
    /// A `documents` table in a SQLite database
    Sqlite,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Directory for text files
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Path to the SQLite database file (sqlite format only)
    #[serde(rename = "database-path")]
    pub database_path: Option<String>,

    /// Path to the markdown run report
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

/// A document with one or more known locations
#[derive(Debug, Clone, Deserialize)]
pub struct TargetEntry {
    /// Output identifier; derived from `name` when absent
    pub id: Option<String>,

    /// Human-readable document name
    pub name: String,

    /// Candidate URLs, tried in order
    pub urls: Vec<String>,
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_min_accept_length() -> usize {
    1000
}

fn default_true() -> bool {
    true
}

fn default_identity() -> String {
    DEFAULT_IDENTITY.to_string()
}

fn default_directory() -> String {
    "works".to_string()
}

fn default_min_blocks() -> usize {
    10
}

fn default_min_block_chars() -> usize {
    10
}

/// Full-text page links in their absolute, relative and parent-relative forms
pub fn default_link_patterns() -> Vec<String> {
    vec![
        r"(?i)^.*/[^/]+/full\.html$".to_string(),
        r"(?i)^.*full\.html$".to_string(),
        r"(?i)^\.\./.*full\.html$".to_string(),
    ]
}
