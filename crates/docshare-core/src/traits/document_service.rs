//! Document service trait: the remote side of every share.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::result::AppResult;
use crate::types::{DocumentNo, LinkId, ProgressReporter, ShareHistoryEntry, ShareReceipt, ShareUpload};

/// Remote document-management service.
///
/// The HTTP binding lives in `docshare-client`; tests provide scripted
/// in-memory implementations.
#[async_trait]
pub trait DocumentService: Send + Sync + std::fmt::Debug + 'static {
    /// Name of the binding (e.g., "rest").
    fn binding_name(&self) -> &str;

    /// Verify the configured credentials are accepted.
    async fn check_access(&self) -> AppResult<()>;

    /// Upload the files and create a shared link for them.
    ///
    /// Byte progress is pushed into `progress`. Implementations check
    /// `cancel` between phases and while sending, returning a
    /// `Cancelled` error once it fires.
    async fn share_files(
        &self,
        upload: ShareUpload,
        progress: ProgressReporter,
        cancel: CancellationToken,
    ) -> AppResult<ShareReceipt>;

    /// List links created by the current user.
    async fn share_history(&self) -> AppResult<Vec<ShareHistoryEntry>>;

    /// Revoke a shared link.
    async fn revoke_shared_link(&self, link_id: &LinkId) -> AppResult<()>;

    /// Delete a document and every link pointing at it.
    async fn delete_document(&self, document_no: DocumentNo) -> AppResult<()>;
}
