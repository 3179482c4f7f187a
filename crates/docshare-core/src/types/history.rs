//! Previously created shared links.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{DocumentNo, LinkId};

/// One link from the "shared by me" list.
///
/// Owned by the document service; clients hold a copy refreshed on every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareHistoryEntry {
    /// File name offered for download.
    pub filename: String,
    /// Public URL of the link.
    pub url: String,
    /// Link identifier used for revocation.
    pub link_id: LinkId,
    /// Document the link points at.
    pub document_no: DocumentNo,
    /// When the link was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the link expires, if ever.
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the link requires a password.
    pub has_password: bool,
    /// Category holding the document.
    pub category_name: String,
}

impl ShareHistoryEntry {
    /// Whether the link has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}
