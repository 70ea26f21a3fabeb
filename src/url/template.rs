use crate::{UrlError, UrlResult};
use url::Url;

/// Placeholder substituted with the 1-based page index
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Placeholder substituted with the author slug
pub const AUTHOR_PLACEHOLDER: &str = "{author}";

/// Builds the URL of one page of an author's poem listing
///
/// # Arguments
///
/// * `host` - The site root, e.g. `https://www.poemhunter.com`
/// * `template` - Path template containing `{author}` and `{page}`
/// * `slug` - The author slug (see [`author_slug`](super::author_slug))
/// * `page` - The 1-based page number
///
/// # Examples
///
/// ```
/// use poem_harvest::url::author_listing_url;
/// use url::Url;
///
/// let host = Url::parse("https://www.poemhunter.com").unwrap();
/// let url = author_listing_url(&host, "/{author}/poems/page-{page}", "robert-frost", 2).unwrap();
/// assert_eq!(url.as_str(), "https://www.poemhunter.com/robert-frost/poems/page-2");
/// ```
pub fn author_listing_url(host: &Url, template: &str, slug: &str, page: u32) -> UrlResult<Url> {
    require_placeholder(template, AUTHOR_PLACEHOLDER)?;
    let path = template.replace(AUTHOR_PLACEHOLDER, slug);
    expand_page(host, &path, page)
}

/// Builds the URL of one page of the top authors listing
pub fn top_authors_url(host: &Url, template: &str, page: u32) -> UrlResult<Url> {
    expand_page(host, template, page)
}

fn expand_page(host: &Url, template: &str, page: u32) -> UrlResult<Url> {
    require_placeholder(template, PAGE_PLACEHOLDER)?;
    let path = template.replace(PAGE_PLACEHOLDER, &page.to_string());
    host.join(&path).map_err(|e| UrlError::Parse(e.to_string()))
}

fn require_placeholder(template: &str, placeholder: &'static str) -> UrlResult<()> {
    if template.contains(placeholder) {
        Ok(())
    } else {
        Err(UrlError::MissingPlaceholder {
            template: template.to_string(),
            placeholder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> Url {
        Url::parse("http://127.0.0.1:8080").unwrap()
    }

    #[test]
    fn test_author_listing_first_page() {
        let url = author_listing_url(&host(), "/{author}/poems/page-{page}", "rumi", 1).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/rumi/poems/page-1");
    }

    #[test]
    fn test_top_authors_query_template() {
        let url = top_authors_url(&host(), "/p/t/l.asp?p={page}", 3).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/p/t/l.asp?p=3");
    }

    #[test]
    fn test_missing_page_placeholder() {
        let err = top_authors_url(&host(), "/top-poets", 1).unwrap_err();
        assert!(matches!(
            err,
            UrlError::MissingPlaceholder {
                placeholder: "{page}",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_author_placeholder() {
        let err = author_listing_url(&host(), "/poems/page-{page}", "rumi", 1).unwrap_err();
        assert!(matches!(
            err,
            UrlError::MissingPlaceholder {
                placeholder: "{author}",
                ..
            }
        ));
    }
}
