//! Storage traits
//!
//! This module defines the interface for document persistence backends.

use crate::StoreError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for document store implementations
///
/// A store writes one normalized document per title. Deduplication is the
/// caller's job; a store overwrites whatever already sits at the target.
/// Implementations are shared between worker tasks and must be thread-safe.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists `lines` under `title` inside `destination`
    ///
    /// # Arguments
    ///
    /// * `title` - The document title; implementations decide how it maps to a name
    /// * `lines` - The normalized lines, written in order
    /// * `destination` - Directory that receives the document
    ///
    /// # Returns
    ///
    /// The path of the written document
    async fn save(&self, title: &str, lines: &[String], destination: &Path)
        -> StoreResult<PathBuf>;
}
