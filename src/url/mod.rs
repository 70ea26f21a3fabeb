//! URL handling module for Poem-Harvest
//!
//! This module turns author names into URL slugs, expands the paginated
//! listing templates and resolves the relative links found on listing pages.

mod slug;
mod template;

pub use slug::{author_slug, slug_from_href};
pub use template::{author_listing_url, top_authors_url, AUTHOR_PLACEHOLDER, PAGE_PLACEHOLDER};

use url::Url;

/// Resolves a link href against the site host
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: and data: schemes
/// - hrefs that do not resolve to an HTTP(S) URL
///
/// # Examples
///
/// ```
/// use poem_harvest::url::resolve_href;
/// use url::Url;
///
/// let host = Url::parse("https://www.poemhunter.com").unwrap();
/// let url = resolve_href(&host, "/poem/rain/").unwrap();
/// assert_eq!(url.as_str(), "https://www.poemhunter.com/poem/rain/");
/// ```
pub fn resolve_href(host: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let resolved = host.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> Url {
        Url::parse("https://www.poemhunter.com").unwrap()
    }

    #[test]
    fn test_resolve_relative_href() {
        let url = resolve_href(&host(), "/poem/dusk/").unwrap();
        assert_eq!(url.as_str(), "https://www.poemhunter.com/poem/dusk/");
    }

    #[test]
    fn test_resolve_absolute_href() {
        let url = resolve_href(&host(), "https://mirror.example.com/poem/dusk/").unwrap();
        assert_eq!(url.host_str(), Some("mirror.example.com"));
    }

    #[test]
    fn test_skip_special_schemes() {
        assert!(resolve_href(&host(), "javascript:void(0)").is_none());
        assert!(resolve_href(&host(), "mailto:poet@example.com").is_none());
        assert!(resolve_href(&host(), "tel:+123").is_none());
        assert!(resolve_href(&host(), "data:text/plain,hi").is_none());
    }

    #[test]
    fn test_skip_empty_and_fragment() {
        assert!(resolve_href(&host(), "").is_none());
        assert!(resolve_href(&host(), "   ").is_none());
        assert!(resolve_href(&host(), "#top").is_none());
    }

    #[test]
    fn test_skip_non_http_scheme() {
        assert!(resolve_href(&host(), "ftp://example.com/poem").is_none());
    }
}
