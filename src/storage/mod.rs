//! Storage module for persisting harvested poems
//!
//! This module handles:
//! - Writing normalized documents to per-title text files
//! - Sanitizing titles into safe file names
//! - Creating per-author destination directories
//! - Tracking which titles were already saved for an author

mod downloaded;
mod file_store;
mod sanitize;
mod traits;

pub use downloaded::DownloadedSet;
pub use file_store::{render_lines, FileStore};
pub use sanitize::{author_destination, sanitize_file_name, FALLBACK_NAME};
pub use traits::{DocumentStore, StoreResult};
