/// Formats an author name the way it appears in listing URLs
///
/// The name is lowercased and each run of whitespace becomes a single hyphen.
///
/// # Examples
///
/// ```
/// use poem_harvest::url::author_slug;
///
/// assert_eq!(author_slug("Robert Frost"), "robert-frost");
/// ```
pub fn author_slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Extracts an author slug from a link such as `/robert-frost/` or
/// `https://host/robert-frost/poems/`
///
/// The first non-empty path segment is taken. Returns None when the path
/// has no segments.
pub fn slug_from_href(href: &str) -> Option<String> {
    let path = match url::Url::parse(href) {
        Ok(url) => url.path().to_string(),
        Err(_) => href.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    path.split('/')
        .find(|segment| !segment.is_empty())
        .map(str::to_lowercase)
}
