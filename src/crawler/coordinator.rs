//! Crawl coordinator - per-author pagination and poem dispatch
//!
//! This module contains the loop that walks an author's listing pages in
//! order, hands one fetch-and-save task per new poem to a bounded worker pool,
//! and collects every task's outcome into a [`CrawlReport`].
//!
//! Listing pages are fetched one at a time by the coordinator itself; page
//! N+1 is only requested once page N's poems are dispatched. All poem I/O
//! happens inside the pool.

use crate::crawler::context::CrawlContext;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::normalizer::normalize;
use crate::crawler::parser::{DocumentParser, ListingPage};
use crate::crawler::pool::{Completed, WorkerPool};
use crate::output::{CrawlReport, FailureStage, ItemFailure};
use crate::state::{CrawlPhase, StateError};
use crate::storage::{author_destination, sanitize_file_name, DocumentStore, DownloadedSet};
use crate::url::{author_listing_url, author_slug, resolve_href};
use crate::HarvestError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// An author whose poems are harvested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Display name, written as the footer of every poem
    pub name: String,

    /// URL form of the name used in listing paths
    pub slug: String,
}

impl Author {
    /// Creates an author whose slug is derived from the name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = author_slug(&name);
        Self { name, slug }
    }

    pub fn with_slug(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
        }
    }
}

/// How a single poem task resolved
#[derive(Debug)]
enum PoemOutcome {
    Saved { path: PathBuf },
    /// Another task saved under the same file name first
    Duplicate,
    Failed { stage: FailureStage, cause: String },
}

/// Inputs of one fetch-and-save task
///
/// Everything is owned so the task shares nothing with the coordinator but
/// the dedupe set handle.
struct PoemTask {
    title: String,
    /// File name the poem is saved under, which is also its dedupe key
    key: String,
    url: Url,
    author: String,
    destination: PathBuf,
    downloaded: DownloadedSet,
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn DocumentParser>,
    store: Arc<dyn DocumentStore>,
}

impl PoemTask {
    async fn run(self) -> PoemOutcome {
        let body = match self.fetcher.fetch(self.url.as_str()).await {
            Ok(body) => body,
            Err(e) => {
                return PoemOutcome::Failed {
                    stage: FailureStage::Download,
                    cause: e.to_string(),
                }
            }
        };

        let lines = self.parser.parse_document(&body);
        if lines.is_empty() {
            tracing::debug!("No poem text found for \"{}\" at {}", self.title, self.url);
        }
        let document = normalize(&self.title, &self.author, lines);

        if !self.downloaded.claim(&self.key) {
            return PoemOutcome::Duplicate;
        }

        match self
            .store
            .save(&self.title, &document, &self.destination)
            .await
        {
            Ok(path) => PoemOutcome::Saved { path },
            Err(e) => {
                self.downloaded.release(&self.key);
                PoemOutcome::Failed {
                    stage: FailureStage::Save,
                    cause: e.to_string(),
                }
            }
        }
    }
}

/// Coordinates the harvest of one author's poems
///
/// Each coordinator owns its dedupe set and its worker pool; nothing is
/// shared across authors.
pub struct CrawlCoordinator {
    context: CrawlContext,
    author: Author,
    destination: PathBuf,
    downloaded: DownloadedSet,
    phase: CrawlPhase,
}

impl CrawlCoordinator {
    /// Creates a coordinator writing into an existing `destination`
    pub fn new(context: CrawlContext, author: Author, destination: PathBuf) -> Self {
        Self {
            context,
            author,
            destination,
            downloaded: DownloadedSet::new(),
            phase: CrawlPhase::Paginating,
        }
    }

    /// Creates a coordinator for `author`, deriving and creating its directory
    /// under `base`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlCoordinator)` - Ready to run
    /// * `Err(HarvestError)` - The author directory could not be created
    pub async fn for_author(
        context: CrawlContext,
        author: Author,
        base: &Path,
    ) -> Result<Self, HarvestError> {
        let destination = author_destination(base, &author.name).await?;
        Ok(Self::new(context, author, destination))
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// File names saved so far
    pub fn downloaded(&self) -> &DownloadedSet {
        &self.downloaded
    }

    /// Runs the crawl to completion
    ///
    /// Walks listing pages from page 1 until a page fails to load, comes back
    /// empty, or has no next link. Then waits for every dispatched poem.
    /// Poem failures are recorded in the report, never returned.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Every dispatched task resolved
    /// * `Err(HarvestError)` - The coordinator was already run
    pub async fn run(&mut self) -> Result<CrawlReport, HarvestError> {
        if self.phase != CrawlPhase::Paginating {
            return Err(StateError::InvalidTransition {
                from: self.phase,
                to: CrawlPhase::Paginating,
            }
            .into());
        }

        tracing::info!(
            "Harvesting poems of {} into {}",
            self.author.name,
            self.destination.display()
        );

        let mut report = CrawlReport::new(&self.author.name, &self.destination);
        let mut pool: WorkerPool<String, PoemOutcome> = WorkerPool::new(self.context.concurrency);
        let mut dispatched: HashSet<String> = HashSet::new();
        let mut page = 1u32;

        while self.phase.accepts_dispatch() {
            let listing = match self.load_listing(page).await {
                Ok(Some(listing)) => listing,
                Ok(None) => {
                    tracing::debug!("Listing page {} of {} is empty", page, self.author.name);
                    self.advance(CrawlPhase::Draining)?;
                    break;
                }
                Err(e) => {
                    tracing::warn!("Error loading page {} of {}: {}", page, self.author.name, e);
                    if self.context.verbose {
                        self.context
                            .progress
                            .line(format_args!("Error loading page {}: {}", page, e));
                    }
                    report.pagination_error = Some(e.to_string());
                    self.advance(CrawlPhase::Draining)?;
                    break;
                }
            };

            report.pages_fetched += 1;
            tracing::debug!(
                "Page {} of {} lists {} poems",
                page,
                self.author.name,
                listing.items.len()
            );

            for item in listing.items {
                // Titles that sanitize to the same file name count as one poem
                let key = sanitize_file_name(&item.title);
                if self.downloaded.contains(&key) || !dispatched.insert(key.clone()) {
                    tracing::debug!("Skipping duplicate \"{}\" ({})", item.title, key);
                    report.duplicates_skipped += 1;
                    continue;
                }

                let Some(url) = resolve_href(&self.context.host, &item.href) else {
                    let cause = format!("unusable link {:?}", item.href);
                    self.record_failure(
                        &mut report,
                        ItemFailure::new(item.title, FailureStage::Link, cause),
                    );
                    continue;
                };

                let task = PoemTask {
                    title: item.title.clone(),
                    key,
                    url,
                    author: self.author.name.clone(),
                    destination: self.destination.clone(),
                    downloaded: self.downloaded.clone(),
                    fetcher: self.context.fetcher.clone(),
                    parser: self.context.parser.clone(),
                    store: self.context.store.clone(),
                };

                report.dispatched += 1;
                for done in pool.submit(item.title, task.run()).await {
                    self.record(done, &mut report);
                }
            }

            if listing.has_next {
                page += 1;
            } else {
                self.advance(CrawlPhase::Draining)?;
            }
        }

        tracing::debug!(
            "Waiting on {} poems of {}",
            pool.in_flight(),
            self.author.name
        );
        for done in pool.drain().await {
            self.record(done, &mut report);
        }
        self.advance(CrawlPhase::Done)?;
        report.finish();

        tracing::info!(
            "Finished {}: {} saved, {} failed across {} listing pages",
            self.author.name,
            report.saved.len(),
            report.failures.len(),
            report.pages_fetched
        );

        Ok(report)
    }

    /// Fetches and parses one listing page; `None` means the body was empty
    async fn load_listing(&self, page: u32) -> Result<Option<ListingPage>, HarvestError> {
        let url = author_listing_url(
            &self.context.host,
            &self.context.site.poems_path,
            &self.author.slug,
            page,
        )?;

        let body = self.context.fetcher.fetch(url.as_str()).await?;
        if body.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.context.parser.parse_listing(&body)))
    }

    fn advance(&mut self, next: CrawlPhase) -> Result<(), StateError> {
        self.phase = self.phase.transition(next)?;
        Ok(())
    }

    fn record(&self, done: Completed<String, PoemOutcome>, report: &mut CrawlReport) {
        let title = done.key;
        match done.result {
            Ok(PoemOutcome::Saved { path }) => {
                tracing::debug!("Saved \"{}\" to {}", title, path.display());
                if self.context.verbose {
                    self.context.progress.saved(&title);
                }
                report.saved.push(title);
            }
            Ok(PoemOutcome::Duplicate) => {
                tracing::debug!("\"{}\" was already saved", title);
                report.duplicates_skipped += 1;
            }
            Ok(PoemOutcome::Failed { stage, cause }) => {
                self.record_failure(report, ItemFailure::new(title, stage, cause));
            }
            Err(e) => {
                self.record_failure(report, ItemFailure::new(title, FailureStage::Task, e));
            }
        }
    }

    fn record_failure(&self, report: &mut CrawlReport, failure: ItemFailure) {
        tracing::warn!("{}", failure);
        if self.context.verbose {
            self.context.progress.failure(&failure);
        }
        report.failures.push(failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SelectorConfig, SiteConfig};
    use crate::crawler::parser::SelectorParser;
    use crate::output::Progress;
    use crate::storage::{FileStore, StoreResult};
    use crate::{FetchError, StoreError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::io::{self, Write};
    use std::sync::Mutex;
    use tempfile::TempDir;

    const HOST: &str = "http://poems.test";

    /// Serves canned bodies and records every requested URL
    #[derive(Default)]
    struct MapFetcher {
        pages: HashMap<String, Result<Vec<u8>, u16>>,
        log: Mutex<Vec<String>>,
    }

    impl MapFetcher {
        fn page(mut self, path: &str, body: &str) -> Self {
            self.pages
                .insert(format!("{}{}", HOST, path), Ok(body.as_bytes().to_vec()));
            self
        }

        fn status(mut self, path: &str, status: u16) -> Self {
            self.pages.insert(format!("{}{}", HOST, path), Err(status));
            self
        }

        fn requests_for(&self, path: &str) -> usize {
            let url = format!("{}{}", HOST, path);
            self.log.lock().unwrap().iter().filter(|u| **u == url).count()
        }
    }

    #[async_trait]
    impl Fetcher for MapFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.log.lock().unwrap().push(url.to_string());
            match self.pages.get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(FetchError::Status {
                    url: url.to_string(),
                    status: *status,
                }),
                None => Err(FetchError::Network {
                    url: url.to_string(),
                    message: "connection refused".to_string(),
                }),
            }
        }
    }

    /// Refuses to save one particular title
    struct PickyStore {
        refuse: &'static str,
    }

    #[async_trait]
    impl DocumentStore for PickyStore {
        async fn save(
            &self,
            title: &str,
            lines: &[String],
            destination: &Path,
        ) -> StoreResult<PathBuf> {
            if title == self.refuse {
                return Err(StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("{} is read-only", title),
                )));
            }
            FileStore::new().save(title, lines, destination).await
        }
    }

    fn listing(items: &[(&str, &str)], next: bool) -> String {
        let rows: String = items
            .iter()
            .map(|(title, href)| {
                format!(r#"<tr><td>1</td><td><a href="{}">{}</a></td></tr>"#, href, title)
            })
            .collect();
        let next = if next {
            r#"<div class="next"><a href="page-next">Next</a></div>"#
        } else {
            ""
        };
        format!(
            r#"<table class="poems"><tbody>{}</tbody></table>{}"#,
            rows, next
        )
    }

    fn poem(body: &str) -> String {
        format!(r#"<div class="poem"><p>{}</p></div>"#, body)
    }

    fn context(fetcher: Arc<MapFetcher>, store: Arc<dyn DocumentStore>) -> CrawlContext {
        let parser = SelectorParser::new(&SelectorConfig {
            body: ".poem p".to_string(),
            ..SelectorConfig::default()
        })
        .unwrap();
        let site = SiteConfig {
            host: HOST.to_string(),
            ..SiteConfig::default()
        };
        CrawlContext::new(fetcher, Arc::new(parser), store, site)
            .unwrap()
            .with_concurrency(4)
    }

    fn coordinator(fetcher: Arc<MapFetcher>, dir: &TempDir) -> CrawlCoordinator {
        CrawlCoordinator::new(
            context(fetcher, Arc::new(FileStore::new())),
            Author::new("Poet"),
            dir.path().to_path_buf(),
        )
    }

    /// Collects progress lines written by a verbose run
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn read(dir: &TempDir, name: &str) -> String {
        std::fs::read_to_string(dir.path().join(name)).unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_across_pages_saved_once() {
        let fetcher = Arc::new(
            MapFetcher::default()
                .page(
                    "/poet/poems/page-1",
                    &listing(&[("Rain", "/poem/rain/"), ("Dusk", "/poem/dusk/")], true),
                )
                .page("/poet/poems/page-2", &listing(&[("Rain", "/poem/rain/")], false))
                .page("/poem/rain/", &poem("drops<br>fall"))
                .page("/poem/dusk/", &poem("light<br>fades")),
        );
        let dir = TempDir::new().unwrap();

        let report = coordinator(fetcher.clone(), &dir).run().await.unwrap();

        assert_eq!(report.pages_fetched, 2);
        assert_eq!(fetcher.requests_for("/poet/poems/page-3"), 0);
        assert_eq!(fetcher.requests_for("/poem/rain/"), 1);

        let mut saved = report.saved.clone();
        saved.sort();
        assert_eq!(saved, vec!["Dusk", "Rain"]);
        assert_eq!(report.dispatched, 2);
        assert_eq!(report.duplicates_skipped, 1);

        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 2);
        assert_eq!(read(&dir, "Rain"), "Rain\n\n\ndrops\nfall\n\n\nPoet\n");
    }

    #[tokio::test]
    async fn test_verbose_run_announces_each_save_once() {
        let fetcher = Arc::new(
            MapFetcher::default()
                .page(
                    "/poet/poems/page-1",
                    &listing(&[("Rain", "/poem/rain/"), ("Dusk", "/poem/dusk/")], true),
                )
                .page("/poet/poems/page-2", &listing(&[("Rain", "/poem/rain/")], false))
                .page("/poem/rain/", &poem("drops"))
                .page("/poem/dusk/", &poem("light")),
        );
        let dir = TempDir::new().unwrap();
        let capture = Capture::default();
        let context = context(fetcher, Arc::new(FileStore::new()))
            .verbose(true)
            .with_progress(Progress::to_writer(capture.clone()));

        CrawlCoordinator::new(context, Author::new("Poet"), dir.path().to_path_buf())
            .run()
            .await
            .unwrap();

        let mut lines = capture.lines();
        lines.sort();
        assert_eq!(lines, vec!["\"Dusk\" saved.", "\"Rain\" saved."]);
    }

    #[tokio::test]
    async fn test_quiet_run_prints_nothing() {
        let fetcher = Arc::new(
            MapFetcher::default()
                .page(
                    "/poet/poems/page-1",
                    &listing(&[("Rain", "/poem/rain/"), ("Gone", "/poem/gone/")], false),
                )
                .page("/poem/rain/", &poem("drops")),
        );
        let dir = TempDir::new().unwrap();
        let capture = Capture::default();
        let context = context(fetcher, Arc::new(FileStore::new()))
            .with_progress(Progress::to_writer(capture.clone()));

        let report = CrawlCoordinator::new(context, Author::new("Poet"), dir.path().to_path_buf())
            .run()
            .await
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert!(capture.lines().is_empty());
    }

    #[tokio::test]
    async fn test_titles_sharing_a_file_name_saved_once() {
        let fetcher = Arc::new(
            MapFetcher::default()
                .page(
                    "/poet/poems/page-1",
                    &listing(&[("Why?", "/poem/why-q/"), ("Why*", "/poem/why-star/")], false),
                )
                .page("/poem/why-q/", &poem("asked"))
                .page("/poem/why-star/", &poem("starred")),
        );
        let dir = TempDir::new().unwrap();

        let mut coordinator = coordinator(fetcher.clone(), &dir);
        let report = coordinator.run().await.unwrap();

        assert_eq!(report.saved, vec!["Why?"]);
        assert_eq!(report.duplicates_skipped, 1);
        assert!(report.failures.is_empty());
        assert_eq!(fetcher.requests_for("/poem/why-star/"), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(read(&dir, "Why_"), "Why?\n\n\nasked\n\n\nPoet\n");
        assert!(coordinator.downloaded().contains("Why_"));
    }

    #[tokio::test]
    async fn test_empty_listing_body_stops_pagination() {
        let fetcher = Arc::new(
            MapFetcher::default()
                .page("/poet/poems/page-1", &listing(&[("Rain", "/poem/rain/")], true))
                .page("/poet/poems/page-2", "")
                .page("/poem/rain/", &poem("drops")),
        );
        let dir = TempDir::new().unwrap();

        let report = coordinator(fetcher.clone(), &dir).run().await.unwrap();

        assert_eq!(report.pages_fetched, 1);
        assert_eq!(fetcher.requests_for("/poet/poems/page-2"), 1);
        assert_eq!(fetcher.requests_for("/poet/poems/page-3"), 0);
        assert_eq!(report.saved, vec!["Rain"]);
        assert!(report.pagination_error.is_none());
    }

    #[tokio::test]
    async fn test_listing_fetch_error_ends_pagination() {
        let fetcher = Arc::new(
            MapFetcher::default()
                .page("/poet/poems/page-1", &listing(&[("Rain", "/poem/rain/")], true))
                .status("/poet/poems/page-2", 503)
                .page("/poem/rain/", &poem("drops")),
        );
        let dir = TempDir::new().unwrap();

        let report = coordinator(fetcher.clone(), &dir).run().await.unwrap();

        assert_eq!(report.saved, vec!["Rain"]);
        assert!(report.pagination_error.unwrap().contains("503"));
        assert_eq!(fetcher.requests_for("/poet/poems/page-3"), 0);
    }

    #[tokio::test]
    async fn test_item_fetch_error_does_not_stop_siblings() {
        let fetcher = Arc::new(
            MapFetcher::default()
                .page(
                    "/poet/poems/page-1",
                    &listing(
                        &[
                            ("Rain", "/poem/rain/"),
                            ("Gone", "/poem/gone/"),
                            ("Dusk", "/poem/dusk/"),
                        ],
                        false,
                    ),
                )
                .page("/poem/rain/", &poem("drops"))
                .page("/poem/dusk/", &poem("light")),
        );
        let dir = TempDir::new().unwrap();

        let mut coordinator = coordinator(fetcher, &dir);
        let report = coordinator.run().await.unwrap();

        assert_eq!(report.saved.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].title, "Gone");
        assert_eq!(report.failures[0].stage, FailureStage::Download);
        assert!(!dir.path().join("Gone").exists());
        assert!(!coordinator.downloaded().contains("Gone"));
        assert_eq!(coordinator.phase(), CrawlPhase::Done);
    }

    #[tokio::test]
    async fn test_store_failure_releases_title() {
        let fetcher = Arc::new(
            MapFetcher::default()
                .page(
                    "/poet/poems/page-1",
                    &listing(&[("Rain", "/poem/rain/"), ("Dusk", "/poem/dusk/")], false),
                )
                .page("/poem/rain/", &poem("drops"))
                .page("/poem/dusk/", &poem("light")),
        );
        let dir = TempDir::new().unwrap();
        let store = Arc::new(PickyStore { refuse: "Dusk" });

        let mut coordinator = CrawlCoordinator::new(
            context(fetcher, store),
            Author::new("Poet"),
            dir.path().to_path_buf(),
        );
        let report = coordinator.run().await.unwrap();

        assert_eq!(report.saved, vec!["Rain"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].stage, FailureStage::Save);
        assert!(coordinator.downloaded().contains("Rain"));
        assert!(!coordinator.downloaded().contains("Dusk"));
    }

    #[tokio::test]
    async fn test_empty_poem_writes_empty_file() {
        let fetcher = Arc::new(
            MapFetcher::default()
                .page("/poet/poems/page-1", &listing(&[("Blank", "/poem/blank/")], false))
                .page("/poem/blank/", ""),
        );
        let dir = TempDir::new().unwrap();

        let report = coordinator(fetcher, &dir).run().await.unwrap();

        assert_eq!(report.saved, vec!["Blank"]);
        assert_eq!(read(&dir, "Blank"), "");
    }

    #[tokio::test]
    async fn test_unresolvable_link_is_reported() {
        let fetcher = Arc::new(MapFetcher::default().page(
            "/poet/poems/page-1",
            &listing(&[("Script", "javascript:void(0)")], false),
        ));
        let dir = TempDir::new().unwrap();

        let report = coordinator(fetcher, &dir).run().await.unwrap();

        assert_eq!(report.dispatched, 0);
        assert_eq!(report.failures[0].stage, FailureStage::Link);
    }

    #[tokio::test]
    async fn test_run_twice_is_rejected() {
        let fetcher = Arc::new(MapFetcher::default().page("/poet/poems/page-1", ""));
        let dir = TempDir::new().unwrap();

        let mut coordinator = coordinator(fetcher, &dir);
        coordinator.run().await.unwrap();

        let second = coordinator.run().await;
        assert!(matches!(second, Err(HarvestError::State(_))));
    }

    #[tokio::test]
    async fn test_many_poems_with_small_pool() {
        let items: Vec<(String, String)> = (0..25)
            .map(|i| (format!("Poem {}", i), format!("/poem/{}/", i)))
            .collect();
        let refs: Vec<(&str, &str)> = items
            .iter()
            .map(|(title, href)| (title.as_str(), href.as_str()))
            .collect();

        let mut fetcher = MapFetcher::default().page("/poet/poems/page-1", &listing(&refs, false));
        for (_, href) in &items {
            fetcher = fetcher.page(href, &poem("line"));
        }
        let dir = TempDir::new().unwrap();

        let context = context(Arc::new(fetcher), Arc::new(FileStore::new())).with_concurrency(2);
        let report = CrawlCoordinator::new(context, Author::new("Poet"), dir.path().to_path_buf())
            .run()
            .await
            .unwrap();

        assert_eq!(report.saved.len(), 25);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_author_slug_from_name() {
        let author = Author::new("Emily Dickinson");
        assert_eq!(author.slug, "emily-dickinson");
    }
}
