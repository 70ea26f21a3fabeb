//! Crawler module for harvesting poems
//!
//! This module contains the core pipeline, including:
//! - HTTP fetching of listing and poem pages
//! - Listing and poem markup parsing
//! - Poem text normalization
//! - A bounded worker pool
//! - Per-author and top-authors coordination

mod collection;
mod context;
mod coordinator;
mod fetcher;
mod normalizer;
mod parser;
mod pool;

pub use collection::CollectionCoordinator;
pub use context::CrawlContext;
pub use coordinator::{Author, CrawlCoordinator};
pub use fetcher::{build_http_client, user_agent_string, Fetcher, HttpFetcher};
pub use normalizer::normalize;
pub use parser::{DocumentParser, ListingItem, ListingPage, SelectorParser};
pub use pool::{Completed, WorkerPool};

use crate::config::Config;
use crate::output::{CollectionReport, CrawlReport};
use crate::HarvestError;
use std::path::Path;

/// Harvests every poem of one author
///
/// This is the entry point for single-author mode. It will:
/// 1. Build the HTTP client, parser and file store from `config`
/// 2. Derive and create the author's directory under `destination`
/// 3. Walk the author's listing and save each poem
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `author` - The author's full name
/// * `destination` - Existing base directory
/// * `verbose` - Print a line per saved or failed poem
///
/// # Example
///
/// ```no_run
/// use poem_harvest::config::Config;
/// use poem_harvest::crawler::harvest_author;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = harvest_author(&Config::default(), "Robert Frost", Path::new("poems"), true).await?;
/// println!("{} poems saved", report.saved.len());
/// # Ok(())
/// # }
/// ```
pub async fn harvest_author(
    config: &Config,
    author: &str,
    destination: &Path,
    verbose: bool,
) -> Result<CrawlReport, HarvestError> {
    let context = CrawlContext::from_config(config)?.verbose(verbose);
    let mut coordinator =
        CrawlCoordinator::for_author(context, Author::new(author), destination).await?;
    coordinator.run().await
}

/// Harvests every poem of the first `count` top authors
pub async fn harvest_top_authors(
    config: &Config,
    count: usize,
    destination: &Path,
    verbose: bool,
) -> Result<CollectionReport, HarvestError> {
    let context = CrawlContext::from_config(config)?.verbose(verbose);
    let mut coordinator = CollectionCoordinator::new(context, destination.to_path_buf(), count);
    coordinator.run().await
}
