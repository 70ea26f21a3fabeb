//! Collection coordinator - harvesting a set of top authors
//!
//! Walks the top authors listing the same way [`CrawlCoordinator`] walks a
//! poem listing, but every dispatched task is a whole author crawl. Author
//! crawls run in their own bounded pool, each with its own inner poem pool.

use crate::crawler::context::CrawlContext;
use crate::crawler::coordinator::{Author, CrawlCoordinator};
use crate::crawler::parser::{ListingItem, ListingPage};
use crate::crawler::pool::{Completed, WorkerPool};
use crate::output::{CollectionReport, CrawlReport, FailureStage, ItemFailure};
use crate::state::{CrawlPhase, StateError};
use crate::url::{author_slug, slug_from_href, top_authors_url};
use crate::HarvestError;
use std::collections::HashSet;
use std::path::PathBuf;

type AuthorOutcome = Result<CrawlReport, HarvestError>;

impl Author {
    /// Builds an author from a top authors listing entry
    ///
    /// The slug comes from the link path when it has one, otherwise from the
    /// name.
    pub fn from_listing(item: &ListingItem) -> Self {
        let slug = slug_from_href(&item.href).unwrap_or_else(|| author_slug(&item.title));
        Self::with_slug(item.title.clone(), slug)
    }
}

/// Coordinates the harvest of the first `requested` top authors
pub struct CollectionCoordinator {
    context: CrawlContext,
    base: PathBuf,
    requested: usize,
    phase: CrawlPhase,
}

impl CollectionCoordinator {
    /// Creates a coordinator saving each author under `base`
    ///
    /// # Arguments
    ///
    /// * `context` - Shared collaborators; its author concurrency caps the outer pool
    /// * `base` - Existing directory that receives one subdirectory per author
    /// * `requested` - Number of authors to harvest, in listing order
    pub fn new(context: CrawlContext, base: PathBuf, requested: usize) -> Self {
        Self {
            context,
            base,
            requested,
            phase: CrawlPhase::Paginating,
        }
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Size of the author pool: `min(requested, author concurrency)`
    pub fn pool_size(&self) -> usize {
        self.requested.min(self.context.author_concurrency).max(1)
    }

    /// Runs every author crawl to completion
    ///
    /// Stops dispatching as soon as `requested` authors are dispatched, even
    /// in the middle of a listing page. Author crawl failures are recorded in
    /// the report.
    pub async fn run(&mut self) -> Result<CollectionReport, HarvestError> {
        if self.phase != CrawlPhase::Paginating {
            return Err(StateError::InvalidTransition {
                from: self.phase,
                to: CrawlPhase::Paginating,
            }
            .into());
        }

        tracing::info!(
            "Harvesting the top {} authors into {} ({} at a time)",
            self.requested,
            self.base.display(),
            self.pool_size()
        );

        let mut report = CollectionReport::new();
        let mut pool: WorkerPool<String, AuthorOutcome> = WorkerPool::new(self.pool_size());
        let mut seen: HashSet<String> = HashSet::new();
        let mut page = 1u32;

        if self.requested == 0 {
            self.advance(CrawlPhase::Draining)?;
        }

        while self.phase.accepts_dispatch() {
            let listing = match self.load_listing(page).await {
                Ok(Some(listing)) => listing,
                Ok(None) => {
                    tracing::debug!("Top authors page {} is empty", page);
                    self.advance(CrawlPhase::Draining)?;
                    break;
                }
                Err(e) => {
                    tracing::warn!("Error loading top authors page {}: {}", page, e);
                    report.pagination_error = Some(e.to_string());
                    self.advance(CrawlPhase::Draining)?;
                    break;
                }
            };
            report.listing_pages_fetched += 1;

            for item in &listing.items {
                if report.requested.len() >= self.requested {
                    break;
                }
                if !seen.insert(item.title.clone()) {
                    continue;
                }

                let author = Author::from_listing(item);
                report.requested.push(author.name.clone());

                let context = self.context.clone();
                let base = self.base.clone();
                let task = async move {
                    let mut coordinator =
                        CrawlCoordinator::for_author(context, author, &base).await?;
                    coordinator.run().await
                };

                for done in pool.submit(item.title.clone(), task).await {
                    self.record(done, &mut report);
                }
            }

            if report.requested.len() >= self.requested || !listing.has_next {
                self.advance(CrawlPhase::Draining)?;
            } else {
                page += 1;
            }
        }

        for done in pool.drain().await {
            self.record(done, &mut report);
        }
        self.advance(CrawlPhase::Done)?;
        report.finish();

        tracing::info!(
            "Finished {} authors: {} poems saved",
            report.authors.len(),
            report.total_saved()
        );

        Ok(report)
    }

    async fn load_listing(&self, page: u32) -> Result<Option<ListingPage>, HarvestError> {
        let url = top_authors_url(
            &self.context.host,
            &self.context.site.top_authors_path,
            page,
        )?;

        let body = self.context.fetcher.fetch(url.as_str()).await?;
        if body.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.context.parser.parse_author_listing(&body)))
    }

    fn advance(&mut self, next: CrawlPhase) -> Result<(), StateError> {
        self.phase = self.phase.transition(next)?;
        Ok(())
    }

    fn record(&self, done: Completed<String, AuthorOutcome>, report: &mut CollectionReport) {
        let failure = match done.result {
            Ok(Ok(author_report)) => {
                report.authors.push(author_report);
                return;
            }
            Ok(Err(e)) => ItemFailure::new(done.key, FailureStage::Task, e),
            Err(e) => ItemFailure::new(done.key, FailureStage::Task, e),
        };

        tracing::warn!("{}", failure);
        if self.context.verbose {
            self.context.progress.failure(&failure);
        }
        report.failures.push(failure);
    }
}
