//! Files chosen for sharing.

use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::error::AppError;
use crate::result::AppResult;

/// Where the content of a pending file comes from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// A file on the local filesystem, read when the upload starts.
    Path(PathBuf),
    /// Content already held in memory (browser-style file handles).
    Memory(Bytes),
}

impl FileSource {
    /// Resolve the source to its full content.
    pub async fn read(&self) -> AppResult<Bytes> {
        match self {
            Self::Path(path) => {
                let data = tokio::fs::read(path).await.map_err(|e| {
                    AppError::with_source(
                        crate::error::ErrorKind::Io,
                        format!("failed to read {}: {e}", path.display()),
                        e,
                    )
                })?;
                Ok(Bytes::from(data))
            }
            Self::Memory(bytes) => Ok(bytes.clone()),
        }
    }
}

/// A file the user picked for the next share.
#[derive(Debug, Clone)]
pub struct PendingFile {
    /// Display name (final path component for path-backed files).
    pub name: String,
    /// Content reference handed to the upload.
    pub source: FileSource,
    /// Size in bytes.
    pub size: u64,
}

impl PendingFile {
    /// Resolve a filesystem path into a pending file.
    ///
    /// The path must exist and must not be a directory.
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await.map_err(|_| {
            AppError::validation(format!("file does not exist: {}", path.display()))
        })?;
        if metadata.is_dir() {
            return Err(AppError::validation(format!(
                "cannot share directory: {}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| AppError::validation(format!("invalid file path: {}", path.display())))?;

        Ok(Self {
            name,
            source: FileSource::Path(path.to_path_buf()),
            size: metadata.len(),
        })
    }

    /// Wrap in-memory content under a display name.
    pub fn in_memory(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    /// Key used for de-duplication: the full path, or the name for memory-backed files.
    pub fn identity_key(&self) -> String {
        match &self.source {
            FileSource::Path(path) => path.to_string_lossy().into_owned(),
            FileSource::Memory(_) => self.name.clone(),
        }
    }
}
