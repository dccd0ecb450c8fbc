use url::Url;

/// Resolves a link href to an absolute URL and validates it
///
/// Relative references are joined against `base_url` with standard URL
/// resolution, so `../hamlet/full.html` seen on `https://host/a/index.html`
/// becomes `https://host/hamlet/full.html`.
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use url::Url;
/// use folio::url::resolve_link;
///
/// let base = Url::parse("https://example.com/plays/").unwrap();
/// let resolved = resolve_link("hamlet/full.html", &base).unwrap();
/// assert_eq!(resolved.as_str(), "https://example.com/plays/hamlet/full.html");
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}
