use url::Url;

/// Name used when a URL has no path segment to name a document after
const UNKNOWN_DOCUMENT: &str = "unknown";

/// Derives a display name from the first path segment of a URL
///
/// The segment immediately after the host names the document; underscores
/// become spaces and the result is title-cased.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use folio::url::document_name_from_url;
///
/// let url = Url::parse("https://shakespeare.mit.edu/romeo_juliet/full.html").unwrap();
/// assert_eq!(document_name_from_url(&url), "Romeo Juliet");
/// ```
pub fn document_name_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next())
        .filter(|segment| !segment.is_empty())
        .map(|segment| title_case(&segment.replace('_', " ")))
        .unwrap_or_else(|| UNKNOWN_DOCUMENT.to_string())
}

/// Title-cases text word by word
///
/// A letter is upper-cased when the previous character is not a letter and
/// lower-cased otherwise, so `"all's well"` becomes `"All'S Well"` and
/// `"1henryiv"` becomes `"1Henryiv"`.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            result.push(c);
            prev_is_letter = false;
        }
    }

    result
}

/// Turns a display name into a filesystem-safe identifier
///
/// Characters other than letters, digits, `_`, `-` and whitespace are dropped,
/// the result is trimmed and each remaining whitespace character becomes `_`.
pub fn slugify(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    kept.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Returns true if the identifier can be used as a file stem as-is
pub fn is_safe_identifier(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_first_segment() {
        let url = Url::parse("https://shakespeare.mit.edu/as_you_like_it/full.html").unwrap();
        assert_eq!(document_name_from_url(&url), "As You Like It");
    }

    #[test]
    fn test_name_with_leading_digit() {
        let url = Url::parse("https://shakespeare.mit.edu/1henryiv/full.html").unwrap();
        assert_eq!(document_name_from_url(&url), "1Henryiv");
    }

    #[test]
    fn test_name_without_segment() {
        let url = Url::parse("https://shakespeare.mit.edu/").unwrap();
        assert_eq!(document_name_from_url(&url), "unknown");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("hamlet"), "Hamlet");
        assert_eq!(title_case("KING LEAR"), "King Lear");
        assert_eq!(title_case("all's well"), "All'S Well");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Romeo and Juliet"), "Romeo_and_Juliet");
        assert_eq!(slugify("All's Well That Ends Well"), "Alls_Well_That_Ends_Well");
        assert_eq!(slugify("  Henry IV, Part 1 "), "Henry_IV_Part_1");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn test_is_safe_identifier() {
        assert!(is_safe_identifier("as_you_like_it"));
        assert!(is_safe_identifier("Henry-VIII"));
        assert!(!is_safe_identifier(""));
        assert!(!is_safe_identifier("../etc/passwd"));
        assert!(!is_safe_identifier("two words"));
    }
}
