//! File selection store.

use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_core::types::PendingFile;

/// Ordered, de-duplicated set of files pending a share.
#[derive(Debug, Clone, Default)]
pub struct FileSelection {
    files: Vec<PendingFile>,
}

impl FileSelection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file unless one with the same identity is already selected.
    ///
    /// Returns `false` when the file was a duplicate.
    pub fn add(&mut self, file: PendingFile) -> bool {
        let key = file.identity_key();
        if self.contains(&key) {
            return false;
        }
        self.files.push(file);
        true
    }

    /// Remove the file at `index`.
    pub fn remove(&mut self, index: usize) -> AppResult<PendingFile> {
        if index >= self.files.len() {
            return Err(AppError::out_of_range(index, self.files.len()));
        }
        Ok(self.files.remove(index))
    }

    /// Remove every file.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Selected files in insertion order.
    pub fn list(&self) -> &[PendingFile] {
        &self.files
    }

    /// Whether a file with this identity key is selected.
    pub fn contains(&self, key: &str) -> bool {
        self.files.iter().any(|f| f.identity_key() == key)
    }

    /// Number of selected files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Combined size of the selected files.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}
