//! Per-author record of saved file names

use dashmap::DashSet;
use std::sync::Arc;

/// File names already saved for one author
///
/// Keys are sanitized file names rather than raw titles, so two titles that
/// map to the same file cannot both be saved. Cloning is cheap and shares the
/// underlying set, so worker tasks can each hold a handle. Claiming a key is
/// a single insert-if-absent.
#[derive(Debug, Clone, Default)]
pub struct DownloadedSet {
    keys: Arc<DashSet<String>>,
}

impl DownloadedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key`, returning false if it was already present
    pub fn claim(&self, key: &str) -> bool {
        self.keys.insert(key.to_string())
    }

    /// Forgets a claimed key after its save failed
    pub fn release(&self, key: &str) {
        self.keys.remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
