//! Core type definitions used across the DocShare workspace.

pub mod file;
pub mod history;
pub mod id;
pub mod progress;
pub mod share;

pub use file::{FileSource, PendingFile};
pub use history::ShareHistoryEntry;
pub use id::*;
pub use progress::{Progress, ProgressReporter, ProgressSignal};
pub use share::{Expiry, ShareOptions, ShareReceipt, ShareUpload, format_size};
