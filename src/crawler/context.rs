//! Shared collaborators for coordinator runs

use crate::config::{Config, SiteConfig};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::parser::{DocumentParser, SelectorParser};
use crate::output::Progress;
use crate::storage::{DocumentStore, FileStore};
use crate::{ConfigError, HarvestError};
use std::sync::Arc;
use url::Url;

/// Everything a coordinator needs besides the author it crawls
///
/// Cloning shares the fetcher, parser and store. Each coordinator still owns
/// its own worker pool and dedupe set.
#[derive(Clone)]
pub struct CrawlContext {
    pub(crate) fetcher: Arc<dyn Fetcher>,
    pub(crate) parser: Arc<dyn DocumentParser>,
    pub(crate) store: Arc<dyn DocumentStore>,
    pub(crate) host: Url,
    pub(crate) site: SiteConfig,
    pub(crate) concurrency: usize,
    pub(crate) author_concurrency: usize,
    pub(crate) verbose: bool,
    pub(crate) progress: Progress,
}

impl CrawlContext {
    /// Creates a context from explicit collaborators
    ///
    /// Pool sizes start at the configuration defaults (30 poems, 10 authors).
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        parser: Arc<dyn DocumentParser>,
        store: Arc<dyn DocumentStore>,
        site: SiteConfig,
    ) -> Result<Self, HarvestError> {
        let host = Url::parse(&site.host).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid host '{}': {}", site.host, e))
        })?;
        let defaults = crate::config::HarvesterConfig::default();

        Ok(Self {
            fetcher,
            parser,
            store,
            host,
            site,
            concurrency: defaults.concurrency,
            author_concurrency: defaults.max_author_concurrency,
            verbose: false,
            progress: Progress::stdout(),
        })
    }

    /// Builds the HTTP fetcher, selector parser and file store from `config`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use poem_harvest::config::Config;
    /// use poem_harvest::crawler::CrawlContext;
    ///
    /// let context = CrawlContext::from_config(&Config::default()).unwrap().verbose(true);
    /// ```
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let fetcher = HttpFetcher::from_config(&config.user_agent)?;
        let parser = SelectorParser::new(&config.selectors)?;

        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(parser),
            Arc::new(FileStore::new()),
            config.site.clone(),
        )?
        .with_concurrency(config.harvester.concurrency)
        .with_author_concurrency(config.harvester.max_author_concurrency))
    }

    /// Sets the number of poems fetched at once per author
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Sets the upper bound on author crawls running at once
    pub fn with_author_concurrency(mut self, concurrency: usize) -> Self {
        self.author_concurrency = concurrency.max(1);
        self
    }

    /// Enables printing of progress lines
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sends progress lines to `progress` instead of stdout
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn author_concurrency(&self) -> usize {
        self.author_concurrency
    }

    pub fn host(&self) -> &Url {
        &self.host
    }
}
