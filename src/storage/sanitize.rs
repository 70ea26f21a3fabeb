//! File name sanitization and per-author destination directories

use crate::StoreError;
use std::path::{Path, PathBuf};

/// Name used when nothing usable is left of a title
pub const FALLBACK_NAME: &str = "untitled";

/// Characters replaced in file names besides separators and control characters
const RESERVED: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Turns a document title into a single, safe path component
///
/// # Rules
///
/// - `/`, `\`, control characters (including NUL) and `<>:"|?*` become `_`
/// - surrounding whitespace is trimmed, then trailing dots
/// - an empty result, `.` or `..` becomes [`FALLBACK_NAME`]
///
/// # Examples
///
/// ```
/// use poem_harvest::storage::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("Rain"), "Rain");
/// assert_eq!(sanitize_file_name("Love / Loss"), "Love _ Loss");
/// assert_eq!(sanitize_file_name(".."), "untitled");
/// ```
pub fn sanitize_file_name(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() || RESERVED.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = replaced.trim().trim_end_matches('.').trim_end();

    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Computes and creates the directory an author's documents are saved in
///
/// If `author` (case-insensitively) already appears in `base`, `base` is used
/// as is. Otherwise a sanitized `author` subdirectory is appended and created.
/// The base directory itself is never created.
///
/// # Arguments
///
/// * `base` - The destination given on the command line; must exist
/// * `author` - The author's display name
///
/// # Returns
///
/// * `Ok(PathBuf)` - The directory to write into
/// * `Err(StoreError)` - The subdirectory could not be created
pub async fn author_destination(base: &Path, author: &str) -> Result<PathBuf, StoreError> {
    let base_lower = base.to_string_lossy().to_lowercase();
    if base_lower.contains(&author.to_lowercase()) {
        return Ok(base.to_path_buf());
    }

    let destination = base.join(sanitize_file_name(author));
    tokio::fs::create_dir_all(&destination)
        .await
        .map_err(|source| StoreError::CreateDir {
            path: destination.display().to_string(),
            source,
        })?;
    Ok(destination)
}
