//! Share defaults and upload tuning.

use serde::{Deserialize, Serialize};

/// Defaults applied when creating a share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Base name of the archive built when several files are shared at once.
    #[serde(default = "default_archive_name")]
    pub archive_name: String,
    /// Expiry used when the caller does not pick one (`"never"`, a day
    /// count, or a `YYYY-MM-DD` date).
    #[serde(default = "default_expiry")]
    pub default_expiry: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            archive_name: default_archive_name(),
            default_expiry: default_expiry(),
        }
    }
}

/// Upload body tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Size of each chunk fed to the request body; progress is reported
    /// once per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_size_bytes: default_chunk_size(),
        }
    }
}

fn default_archive_name() -> String {
    "Archive".to_string()
}

fn default_expiry() -> String {
    "never".to_string()
}

fn default_chunk_size() -> usize {
    64 * 1024
}
