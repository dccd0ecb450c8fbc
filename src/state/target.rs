use crate::config::TargetEntry;
use crate::crawler::DiscoveredLink;
use crate::url::slugify;
use crate::ConfigError;
use url::Url;

/// Identifier used when a name has no characters usable in a file stem
const FALLBACK_IDENTIFIER: &str = "unknown";

/// A logical document and the locations it may be fetched from
///
/// Candidates are tried in order and the first acceptable one wins. The
/// candidate list is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTarget {
    identifier: String,
    display_name: String,
    candidate_urls: Vec<Url>,
}

impl DocumentTarget {
    /// Creates a target, rejecting an empty candidate list
    pub fn new(
        identifier: impl Into<String>,
        display_name: impl Into<String>,
        candidate_urls: Vec<Url>,
    ) -> Result<Self, ConfigError> {
        let display_name = display_name.into();
        if candidate_urls.is_empty() {
            return Err(ConfigError::Validation(format!(
                "document '{}' has no candidate URLs",
                display_name
            )));
        }

        Ok(Self {
            identifier: identifier.into(),
            display_name,
            candidate_urls,
        })
    }

    /// Creates a target whose identifier is derived from its display name
    pub fn named(display_name: &str, candidate_urls: Vec<Url>) -> Result<Self, ConfigError> {
        Self::new(identifier_for(display_name), display_name, candidate_urls)
    }

    /// Builds a target from a `[[target]]` configuration entry
    pub fn from_entry(entry: &TargetEntry) -> Result<Self, ConfigError> {
        let urls = entry
            .urls
            .iter()
            .map(|u| {
                Url::parse(u).map_err(|e| {
                    ConfigError::InvalidUrl(format!("Invalid URL '{}' for '{}': {}", u, entry.name, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match &entry.id {
            Some(id) => Self::new(id.clone(), entry.name.clone(), urls),
            None => Self::named(&entry.name, urls),
        }
    }

    /// Builds a single-candidate target from a discovered link
    pub fn from_link(link: &DiscoveredLink) -> Self {
        Self {
            identifier: identifier_for(&link.identifier),
            display_name: link.identifier.clone(),
            candidate_urls: vec![link.url.clone()],
        }
    }

    /// Stable, filesystem-safe name the text is saved under
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Human-readable name
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Locations to try, in order
    pub fn candidate_urls(&self) -> &[Url] {
        &self.candidate_urls
    }

    /// Returns a copy with a different identifier
    pub(crate) fn with_identifier(mut self, identifier: String) -> Self {
        self.identifier = identifier;
        self
    }
}

/// Derives a slug identifier from a display name
fn identifier_for(display_name: &str) -> String {
    let slug = slugify(display_name);
    if slug.is_empty() {
        FALLBACK_IDENTIFIER.to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_empty_candidates_rejected() {
        assert!(DocumentTarget::new("hamlet", "Hamlet", vec![]).is_err());
    }

    #[test]
    fn test_named_derives_identifier() {
        let target =
            DocumentTarget::named("All's Well That Ends Well", vec![url("https://example.com/a")])
                .unwrap();
        assert_eq!(target.identifier(), "Alls_Well_That_Ends_Well");
        assert_eq!(target.display_name(), "All's Well That Ends Well");
    }

    #[test]
    fn test_from_entry_keeps_order() {
        let entry = TargetEntry {
            id: Some("as_you_like_it".to_string()),
            name: "As You Like It".to_string(),
            urls: vec![
                "https://example.com/as_you_like_it/full.html".to_string(),
                "https://example.com/asyoulikeit/full.html".to_string(),
            ],
        };
        let target = DocumentTarget::from_entry(&entry).unwrap();
        assert_eq!(target.identifier(), "as_you_like_it");
        assert_eq!(target.candidate_urls().len(), 2);
        assert_eq!(
            target.candidate_urls()[1].as_str(),
            "https://example.com/asyoulikeit/full.html"
        );
    }

    #[test]
    fn test_from_link() {
        let link = DiscoveredLink {
            identifier: "Romeo Juliet".to_string(),
            url: url("https://example.com/romeo_juliet/full.html"),
        };
        let target = DocumentTarget::from_link(&link);
        assert_eq!(target.identifier(), "Romeo_Juliet");
        assert_eq!(target.display_name(), "Romeo Juliet");
        assert_eq!(target.candidate_urls(), &[link.url.clone()]);
    }

    #[test]
    fn test_unusable_name_gets_fallback_identifier() {
        let target = DocumentTarget::named("???", vec![url("https://example.com/")]).unwrap();
        assert_eq!(target.identifier(), "unknown");
    }
}
