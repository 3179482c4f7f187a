//! Events delivered by an upload in flight.
//!
//! An upload emits `Started`, then zero or more `Progress` events with
//! non-decreasing byte counts, then exactly one terminal event.

use crate::error::AppError;
use crate::types::{Progress, ShareReceipt};

/// Event emitted by an upload handle.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// The upload body size is known and sending begins.
    Started {
        /// Total bytes of the upload body.
        bytes_total: u64,
    },
    /// More bytes were sent.
    Progress(Progress),
    /// The link was created.
    Completed(ShareReceipt),
    /// The upload or link creation failed.
    Failed(AppError),
    /// The user cancelled the upload.
    Cancelled,
}

impl TransportEvent {
    /// Whether no further event follows this one.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed(_) | Self::Cancelled)
    }

    /// Short name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Progress(_) => "progress",
            Self::Completed(_) => "completed",
            Self::Failed(_) => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}
