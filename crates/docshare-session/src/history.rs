//! Share history: listing, revoking, and deleting previously shared links.
//!
//! The history is owned by the document service. Nothing is cached or
//! patched locally; after a mutation callers fetch again.

use std::sync::Arc;

use async_trait::async_trait;

use docshare_core::result::AppResult;
use docshare_core::traits::DocumentService;
use docshare_core::types::{DocumentNo, LinkId, ShareHistoryEntry};

/// Yes/no confirmation asked before a destructive action.
#[async_trait]
pub trait ConfirmGate: Send + Sync + 'static {
    /// Ask the user; `true` means proceed.
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Gate with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

#[async_trait]
impl ConfirmGate for FixedAnswer {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

/// Renderable result of a history fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView {
    /// The links, newest as returned by the service.
    Entries(Vec<ShareHistoryEntry>),
    /// No links were shared yet.
    Empty,
    /// The history could not be loaded.
    Unavailable(String),
}

/// Outcome of a confirmed-or-declined mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The user confirmed and the service applied the change.
    Applied,
    /// The user declined; nothing was sent.
    Declined,
}

/// Manages the share history independently of any share session.
#[derive(Clone)]
pub struct HistoryManager {
    service: Arc<dyn DocumentService>,
    gate: Arc<dyn ConfirmGate>,
}

impl std::fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl HistoryManager {
    /// Create a manager over a document service and a confirmation gate.
    pub fn new(service: Arc<dyn DocumentService>, gate: Arc<dyn ConfirmGate>) -> Self {
        Self { service, gate }
    }

    /// Fetch the current list of shared links.
    pub async fn fetch(&self) -> AppResult<Vec<ShareHistoryEntry>> {
        let entries = self.service.share_history().await?;
        tracing::debug!(entries = entries.len(), "Fetched share history");
        Ok(entries)
    }

    /// Fetch and turn the outcome into something displayable.
    pub async fn render(&self) -> HistoryView {
        match self.fetch().await {
            Ok(entries) if entries.is_empty() => HistoryView::Empty,
            Ok(entries) => HistoryView::Entries(entries),
            Err(err) => {
                tracing::warn!(error = %err, "Share history unavailable");
                HistoryView::Unavailable(err.user_message().to_string())
            }
        }
    }

    /// Revoke a link after confirmation.
    pub async fn revoke(&self, link_id: &LinkId) -> AppResult<MutationOutcome> {
        let prompt = format!(
            "Revoke shared link {link_id}? Anyone holding the link will lose access."
        );
        if !self.gate.confirm(&prompt).await {
            tracing::debug!(link_id = %link_id, "Revoke declined");
            return Ok(MutationOutcome::Declined);
        }
        self.service.revoke_shared_link(link_id).await?;
        Ok(MutationOutcome::Applied)
    }

    /// Delete a document after confirmation.
    pub async fn delete(&self, document_no: DocumentNo) -> AppResult<MutationOutcome> {
        let prompt = format!(
            "Delete document {document_no}? Every link to it stops working. This cannot be undone."
        );
        if !self.gate.confirm(&prompt).await {
            tracing::debug!(document_no = %document_no, "Delete declined");
            return Ok(MutationOutcome::Declined);
        }
        self.service.delete_document(document_no).await?;
        Ok(MutationOutcome::Applied)
    }
}
