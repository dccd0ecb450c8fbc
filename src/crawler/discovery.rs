//! Document link discovery
//!
//! This module reads an index page and lists the documents it links to:
//! - Collects every `href` value with an HTML parser
//! - Keeps the ones matching the configured link patterns, pattern by pattern
//! - Resolves them against the index URL and names each document after the
//!   first segment of its path

use crate::config::{default_link_patterns, DiscoveryConfig};
use crate::url::{document_name_from_url, resolve_link};
use crate::ConfigError;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// A document link found on an index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// Human-readable name derived from the URL path
    pub identifier: String,

    /// Absolute URL of the document
    pub url: Url,
}

/// Finds document links in index markup
#[derive(Debug, Clone)]
pub struct LinkDiscoverer {
    patterns: Vec<Regex>,
}

impl Default for LinkDiscoverer {
    fn default() -> Self {
        let patterns = default_link_patterns()
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();
        Self { patterns }
    }
}

impl LinkDiscoverer {
    /// Compiles the given href patterns
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", p, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Compiles the patterns from the discovery configuration
    pub fn from_config(config: &DiscoveryConfig) -> Result<Self, ConfigError> {
        Self::new(&config.link_patterns)
    }

    /// Lists document links in the order they are first found
    ///
    /// Patterns are applied one after another over all hrefs on the page, so
    /// links matched by an earlier pattern come first. The result never holds
    /// the same URL twice; two URLs may still share an identifier.
    ///
    /// # Example
    ///
    /// ```
    /// use folio::crawler::LinkDiscoverer;
    /// use url::Url;
    ///
    /// let html = r#"<a href="hamlet/full.html">Hamlet</a> <a href="/hamlet/full.html">again</a>"#;
    /// let base = Url::parse("https://shakespeare.mit.edu/").unwrap();
    /// let links = LinkDiscoverer::default().discover(html, &base);
    /// assert_eq!(links.len(), 1);
    /// assert_eq!(links[0].identifier, "Hamlet");
    /// ```
    pub fn discover(&self, index_markup: &str, base_url: &Url) -> Vec<DiscoveredLink> {
        let hrefs = collect_hrefs(index_markup);
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for pattern in &self.patterns {
            for href in hrefs.iter().filter(|h| pattern.is_match(h)) {
                let Some(url) = resolve_link(href, base_url) else {
                    tracing::trace!("Skipping unresolvable link {}", href);
                    continue;
                };

                if seen.insert(url.as_str().to_string()) {
                    links.push(DiscoveredLink {
                        identifier: document_name_from_url(&url),
                        url,
                    });
                }
            }
        }

        tracing::debug!(
            "Discovered {} document links among {} hrefs",
            links.len(),
            hrefs.len()
        );
        links
    }
}

/// Returns every `href` attribute value in document order
fn collect_hrefs(markup: &str) -> Vec<String> {
    let document = Html::parse_document(markup);
    let Ok(selector) = Selector::parse("[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .collect()
}
