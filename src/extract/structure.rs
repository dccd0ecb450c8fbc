//! Body text extraction
//!
//! The extractor removes script and style regions, narrows the markup to the
//! `<body>` element, and runs every structural recognizer over it. When the
//! recognizers find enough blocks their cleaned text is the result; otherwise
//! the whole content region is stripped of tags instead.

use crate::config::ExtractionConfig;
use crate::extract::entities::decode_entities;
use crate::extract::recognizers::RECOGNIZERS;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("script regex is valid")
});

#[allow(clippy::expect_used)]
static STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("style regex is valid"));

#[allow(clippy::expect_used)]
static BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body[^>]*>(.*?)</body>").expect("body regex is valid"));

#[allow(clippy::expect_used)]
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex is valid"));

#[allow(clippy::expect_used)]
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

#[allow(clippy::expect_used)]
static NON_ASCII: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x00-\x7F]+").expect("non-ascii regex is valid"));

/// Which path produced an extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Recognized blocks were joined line by line
    Structural { blocks: usize },

    /// Too few blocks were recognized; all tags were stripped instead
    Fallback { blocks_found: usize },
}

/// Text recovered from one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// The readable text
    pub body: String,

    /// Length of `body` in characters
    pub length: usize,

    /// How the text was obtained
    pub strategy: ExtractionStrategy,
}

impl ExtractedText {
    fn new(body: String, strategy: ExtractionStrategy) -> Self {
        let length = body.chars().count();
        Self {
            body,
            length,
            strategy,
        }
    }

    /// Returns true if the text came from the fallback path
    pub fn is_fallback(&self) -> bool {
        matches!(self.strategy, ExtractionStrategy::Fallback { .. })
    }
}

/// Structural text extractor
///
/// # Example
///
/// ```
/// use folio::Extractor;
///
/// let extractor = Extractor::default();
/// let text = extractor.extract("<html><body><p>Hello &amp; welcome</p></body></html>");
/// assert_eq!(text.body, "Hello & welcome");
/// assert!(text.is_fallback());
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    min_blocks: usize,
    min_block_chars: usize,
    ascii_only: bool,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

impl Extractor {
    /// Creates an extractor with the configured thresholds
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            min_blocks: config.min_blocks,
            min_block_chars: config.min_block_chars,
            ascii_only: config.ascii_only,
        }
    }

    /// Extracts the readable text of a document
    ///
    /// Never fails: markup without recognizable structure (or without any
    /// markup at all) goes through the fallback path. Whether the result is
    /// long enough to keep is up to the caller.
    pub fn extract(&self, markup: &str) -> ExtractedText {
        let cleaned = strip_non_content(markup);
        let region = content_region(&cleaned);
        let blocks = self.structural_blocks(region);

        let (body, strategy) = if blocks.len() < self.min_blocks {
            tracing::debug!(
                "Only {} structural blocks (need {}), using fallback",
                blocks.len(),
                self.min_blocks
            );
            (
                fallback_text(region),
                ExtractionStrategy::Fallback {
                    blocks_found: blocks.len(),
                },
            )
        } else {
            (
                decode_entities(&blocks.join("\n")),
                ExtractionStrategy::Structural {
                    blocks: blocks.len(),
                },
            )
        };

        let body = if self.ascii_only {
            ascii_only(&body)
        } else {
            body
        };

        ExtractedText::new(body, strategy)
    }

    /// Runs every recognizer over the content region and returns the cleaned
    /// blocks that are long enough to keep, in recognizer order
    pub fn structural_blocks(&self, region: &str) -> Vec<String> {
        let mut blocks = Vec::new();

        for (name, recognize) in RECOGNIZERS {
            let before = blocks.len();
            blocks.extend(
                recognize(region)
                    .into_iter()
                    .map(clean_block)
                    .filter(|block| block.chars().count() > self.min_block_chars),
            );
            tracing::trace!("Recognizer '{}' kept {} blocks", name, blocks.len() - before);
        }

        blocks
    }
}

/// Removes script and style regions
pub fn strip_non_content(markup: &str) -> Cow<'_, str> {
    match SCRIPT.replace_all(markup, "") {
        Cow::Borrowed(unchanged) => STYLE.replace_all(unchanged, ""),
        Cow::Owned(without_scripts) => {
            Cow::Owned(STYLE.replace_all(&without_scripts, "").into_owned())
        }
    }
}

/// Returns the inside of the first `<body>` element, or the whole input
pub fn content_region(markup: &str) -> &str {
    BODY.captures(markup)
        .and_then(|caps| caps.get(1))
        .map_or(markup, |m| m.as_str())
}

/// Strips every tag, collapses whitespace, decodes references and trims
pub fn fallback_text(region: &str) -> String {
    let text = TAG.replace_all(region, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    decode_entities(&text).trim().to_string()
}

/// Replaces tags with spaces, collapses whitespace and trims one block
fn clean_block(block: &str) -> String {
    let text = TAG.replace_all(block, " ");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Replaces each run of non-ASCII characters with a single space
fn ascii_only(text: &str) -> String {
    NON_ASCII.replace_all(text, " ").trim().to_string()
}
