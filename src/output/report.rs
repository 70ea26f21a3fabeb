//! Crawl and collection reports
//!
//! Reports are filled in by the coordinators while tasks resolve and handed
//! back to the caller once every task is done.

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};

/// Step of the per-poem pipeline that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureStage {
    /// The poem link could not be resolved to a URL
    Link,

    /// The poem page could not be fetched
    Download,

    /// The poem could not be written
    Save,

    /// The worker task died before reporting
    Task,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Link | Self::Download | Self::Task => "download",
            Self::Save => "save",
        };
        write!(f, "{}", verb)
    }
}

/// A poem (or author, in collection mode) that was not saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub title: String,
    pub stage: FailureStage,
    pub cause: String,
}

impl ItemFailure {
    pub fn new(title: impl Into<String>, stage: FailureStage, cause: impl ToString) -> Self {
        Self {
            title: title.into(),
            stage,
            cause: cause.to_string(),
        }
    }
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not {} \"{}\": {}", self.stage, self.title, self.cause)
    }
}

/// Outcome of crawling one author
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub author: String,
    pub destination: PathBuf,

    /// Listing pages that returned a body
    pub pages_fetched: u32,

    /// Poem tasks handed to the worker pool
    pub dispatched: usize,

    /// Titles written, in completion order
    pub saved: Vec<String>,

    pub failures: Vec<ItemFailure>,

    /// Listing entries skipped because the title was already handled
    pub duplicates_skipped: usize,

    /// Why pagination stopped early, if a listing fetch failed
    pub pagination_error: Option<String>,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlReport {
    pub fn new(author: impl Into<String>, destination: &Path) -> Self {
        Self {
            author: author.into(),
            destination: destination.to_path_buf(),
            pages_fetched: 0,
            dispatched: 0,
            saved: Vec::new(),
            failures: Vec::new(),
            duplicates_skipped: 0,
            pagination_error: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock seconds between start and finish
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}

/// Outcome of crawling a set of top authors
#[derive(Debug, Clone)]
pub struct CollectionReport {
    /// Authors dispatched, in dispatch order
    pub requested: Vec<String>,

    /// Reports of author crawls that ran, in completion order
    pub authors: Vec<CrawlReport>,

    /// Author crawls that could not run or did not finish
    pub failures: Vec<ItemFailure>,

    pub listing_pages_fetched: u32,
    pub pagination_error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CollectionReport {
    pub fn new() -> Self {
        Self {
            requested: Vec::new(),
            authors: Vec::new(),
            failures: Vec::new(),
            listing_pages_fetched: 0,
            pagination_error: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of poems saved across all authors
    pub fn total_saved(&self) -> usize {
        self.authors.iter().map(|report| report.saved.len()).sum()
    }

    pub fn total_failures(&self) -> usize {
        self.authors.iter().map(|report| report.failures.len()).sum()
    }
}

impl Default for CollectionReport {
    fn default() -> Self {
        Self::new()
    }
}
