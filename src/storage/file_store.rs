//! Plain-text file backend
//!
//! Each document becomes one UTF-8 file whose lines are each terminated by a
//! newline.

use crate::storage::sanitize::sanitize_file_name;
use crate::storage::traits::{DocumentStore, StoreResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Writes documents as text files named after their (sanitized) title
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStore;

impl FileStore {
    pub fn new() -> Self {
        Self
    }

    /// Returns the path a document with `title` would be written to
    pub fn document_path(title: &str, destination: &Path) -> PathBuf {
        destination.join(sanitize_file_name(title))
    }
}

/// Joins lines into file contents, terminating every line with `\n`
pub fn render_lines(lines: &[String]) -> String {
    let capacity = lines.iter().map(|line| line.len() + 1).sum();
    let mut contents = String::with_capacity(capacity);
    for line in lines {
        contents.push_str(line);
        contents.push('\n');
    }
    contents
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn save(
        &self,
        title: &str,
        lines: &[String],
        destination: &Path,
    ) -> StoreResult<PathBuf> {
        let path = Self::document_path(title, destination);
        tokio::fs::write(&path, render_lines(lines)).await?;
        tracing::trace!("Wrote {} lines to {}", lines.len(), path.display());
        Ok(path)
    }
}
