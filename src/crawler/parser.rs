//! HTML parsers for listing and poem pages
//!
//! This module extracts:
//! - Poem links and the next-page marker from an author's listing page
//! - Author links and the next-page marker from the top authors listing
//! - The ordered text lines of a poem page
//!
//! The coordinators only see the [`DocumentParser`] capability, so the
//! markup-query mechanism can be swapped without touching them.

use crate::config::SelectorConfig;
use crate::ConfigError;
use scraper::{ElementRef, Html, Node, Selector};

/// One link found on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    /// Link text: a poem title or an author name
    pub title: String,

    /// The raw href, possibly relative
    pub href: String,
}

impl ListingItem {
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
        }
    }
}

/// Links extracted from one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub items: Vec<ListingItem>,

    /// Whether the page links to a following page
    pub has_next: bool,
}

impl ListingPage {
    /// A page with nothing on it and no successor
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Capability for extracting structure from catalog markup
///
/// Implementations never fail: a page whose layout is not recognized yields
/// an empty result, which ends pagination or produces an empty poem.
pub trait DocumentParser: Send + Sync {
    /// Extracts poem links and the next-page marker
    fn parse_listing(&self, body: &[u8]) -> ListingPage;

    /// Extracts author links and the next-page marker
    fn parse_author_listing(&self, body: &[u8]) -> ListingPage;

    /// Extracts the poem text, one entry per line break
    fn parse_document(&self, body: &[u8]) -> Vec<String>;
}

/// [`DocumentParser`] driven by CSS selectors
#[derive(Debug, Clone)]
pub struct SelectorParser {
    poem_links: Selector,
    author_links: Selector,
    next_page: Selector,
    body: Selector,
}

impl SelectorParser {
    /// Compiles the configured selectors
    ///
    /// # Returns
    ///
    /// * `Ok(SelectorParser)` - Every selector compiled
    /// * `Err(ConfigError)` - A selector is not valid CSS
    pub fn new(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            poem_links: compile(&config.poem_links)?,
            author_links: compile(&config.author_links)?,
            next_page: compile(&config.next_page)?,
            body: compile(&config.body)?,
        })
    }

    fn parse_links(&self, body: &[u8], links: &Selector) -> ListingPage {
        if body.is_empty() {
            return ListingPage::empty();
        }

        let document = Html::parse_document(&String::from_utf8_lossy(body));

        let items = document
            .select(links)
            .filter_map(|element| {
                let href = element.value().attr("href")?;
                let title = element.text().collect::<String>().trim().to_string();
                if title.is_empty() {
                    None
                } else {
                    Some(ListingItem::new(title, href))
                }
            })
            .collect();

        let has_next = document.select(&self.next_page).next().is_some();

        ListingPage { items, has_next }
    }
}

impl DocumentParser for SelectorParser {
    fn parse_listing(&self, body: &[u8]) -> ListingPage {
        self.parse_links(body, &self.poem_links)
    }

    fn parse_author_listing(&self, body: &[u8]) -> ListingPage {
        self.parse_links(body, &self.author_links)
    }

    fn parse_document(&self, body: &[u8]) -> Vec<String> {
        if body.is_empty() {
            return Vec::new();
        }

        let document = Html::parse_document(&String::from_utf8_lossy(body));
        match document.select(&self.body).next() {
            Some(block) => split_on_breaks(block),
            None => Vec::new(),
        }
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::Validation(format!("Invalid selector '{}': {}", selector, e)))
}

/// Splits a content block into lines at each `<br>` child
///
/// Text before the first break is the first line. A break followed directly
/// by another break (or the end of the block) yields an empty line. Text of
/// other inline children is kept in the current line.
fn split_on_breaks(block: ElementRef<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for child in block.children() {
        match child.value() {
            Node::Text(text) => current.push_str(text),
            Node::Element(element) if element.name() == "br" => {
                lines.push(std::mem::take(&mut current));
            }
            Node::Element(_) => {
                if let Some(inline) = ElementRef::wrap(child) {
                    current.extend(inline.text());
                }
            }
            _ => {}
        }
    }

    lines.push(current);
    lines
}
