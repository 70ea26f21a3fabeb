use serde::Deserialize;

/// Main configuration structure for Poem-Harvest
///
/// Every section is optional in the TOML file; missing values take the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub harvester: HarvesterConfig,
    pub site: SiteConfig,
    pub selectors: SelectorConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Worker pool sizing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarvesterConfig {
    /// Number of poems fetched concurrently per author
    pub concurrency: usize,

    /// Upper bound on author crawls running at once in top-authors mode
    #[serde(rename = "max-author-concurrency")]
    pub max_author_concurrency: usize,
}

impl Default for HarvesterConfig {
    fn default() -> Self {
        Self {
            concurrency: 30,
            max_author_concurrency: 10,
        }
    }
}

/// Remote catalog location and URL templates
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site root that relative links are resolved against
    pub host: String,

    /// Path of one page of an author's poem listing
    #[serde(rename = "poems-path")]
    pub poems_path: String,

    /// Path of one page of the top authors listing
    #[serde(rename = "top-authors-path")]
    pub top_authors_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host: "https://www.poemhunter.com".to_string(),
            poems_path: "/{author}/poems/page-{page}".to_string(),
            top_authors_path: "/p/t/l.asp?p={page}".to_string(),
        }
    }
}

/// CSS selectors used to locate content in the catalog markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Poem links on an author's listing page
    #[serde(rename = "poem-links")]
    pub poem_links: String,

    /// Author links on the top authors listing page
    #[serde(rename = "author-links")]
    pub author_links: String,

    /// Link to the following listing page
    #[serde(rename = "next-page")]
    pub next_page: String,

    /// Block holding the poem text
    pub body: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            poem_links: ".poems tbody tr td:nth-child(2) a".to_string(),
            author_links: ".poets tbody tr td:nth-child(2) a".to_string(),
            next_page: ".next a".to_string(),
            body: "body > div:nth-of-type(1) > div:nth-of-type(6) > div:nth-of-type(3) > div \
                   > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(1) > p"
                .to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "PoemHarvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/poem-harvest/poem-harvest".to_string(),
        }
    }
}
