//! Progress lines and end-of-run summaries
//!
//! Progress lines go to a [`Progress`] sink (stdout unless replaced) and are
//! only printed in verbose mode. Summaries are printed by the binary once a
//! run is finished.

use crate::output::report::{CollectionReport, CrawlReport, ItemFailure};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Destination of verbose progress lines
///
/// Clones share one writer; each line is written under its lock so lines from
/// concurrent tasks never interleave.
#[derive(Clone)]
pub struct Progress {
    out: Arc<Mutex<dyn Write + Send>>,
}

impl Progress {
    /// Progress lines on standard output
    pub fn stdout() -> Self {
        Self::to_writer(io::stdout())
    }

    pub fn to_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(writer)),
        }
    }

    /// Announces a saved poem
    pub fn saved(&self, title: &str) {
        self.line(format_args!("\"{}\" saved.", title));
    }

    /// Announces a poem (or author) that was not saved
    pub fn failure(&self, failure: &ItemFailure) {
        self.line(format_args!("{}", failure));
    }

    pub fn line(&self, args: fmt::Arguments<'_>) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(e) = writeln!(out, "{}", args) {
            tracing::debug!("Could not write progress line: {}", e);
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::stdout()
    }
}

/// Prints the summary of one author crawl
///
/// # Arguments
///
/// * `report` - The finished crawl report
pub fn print_crawl_summary(report: &CrawlReport) {
    println!("=== {} ===", report.author);
    println!("  Destination: {}", report.destination.display());
    println!("  Listing pages: {}", report.pages_fetched);
    println!("  Poems dispatched: {}", report.dispatched);
    println!("  Poems saved: {}", report.saved.len());
    println!("  Failures: {}", report.failures.len());
    if report.duplicates_skipped > 0 {
        println!("  Duplicates skipped: {}", report.duplicates_skipped);
    }
    if let Some(error) = &report.pagination_error {
        println!("  Pagination stopped: {}", error);
    }
    if let Some(seconds) = report.duration_seconds() {
        println!("  Duration: {:.1}s", seconds);
    }
}

/// Prints the summary of a top-authors run, one block per author
pub fn print_collection_summary(report: &CollectionReport) {
    for author in &report.authors {
        print_crawl_summary(author);
    }

    println!();
    println!(
        "Authors: {} requested, {} crawled, {} failed",
        report.requested.len(),
        report.authors.len(),
        report.failures.len()
    );
    for failure in &report.failures {
        println!("  - {}", failure);
    }
    println!(
        "Poems saved: {} ({} failures)",
        report.total_saved(),
        report.total_failures()
    );
    if let Some(error) = &report.pagination_error {
        println!("Author listing stopped: {}", error);
    }
}
