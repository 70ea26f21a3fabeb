//! Output module for crawl reports
//!
//! This module handles:
//! - Collecting per-author and per-collection crawl results
//! - Printing verbose progress lines
//! - Printing end-of-run summaries

mod report;
pub mod stats;

pub use report::{CollectionReport, CrawlReport, FailureStage, ItemFailure};
pub use stats::{print_collection_summary, print_crawl_summary, Progress};
