//! [`DocumentService`] implementation over the REST client.

use async_trait::async_trait;
use chrono::{Local, Utc};
use tokio_util::sync::CancellationToken;

use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_core::traits::DocumentService;
use docshare_core::types::{
    DocumentNo, LinkId, ProgressReporter, ShareHistoryEntry, ShareReceipt, ShareUpload,
};

use crate::archive::package_files;
use crate::client::ServiceClient;

fn ensure_not_cancelled(cancel: &CancellationToken) -> AppResult<()> {
    if cancel.is_cancelled() {
        return Err(AppError::cancelled());
    }
    Ok(())
}

#[async_trait]
impl DocumentService for ServiceClient {
    fn binding_name(&self) -> &str {
        "rest"
    }

    async fn check_access(&self) -> AppResult<()> {
        ServiceClient::check_access(self).await
    }

    async fn share_files(
        &self,
        upload: ShareUpload,
        progress: ProgressReporter,
        cancel: CancellationToken,
    ) -> AppResult<ShareReceipt> {
        upload.options.expiry.validate()?;
        let package = package_files(&upload.files, self.archive_name(), Local::now()).await?;
        ensure_not_cancelled(&cancel)?;

        let document = self.create_document(&package, &progress, &cancel).await?;
        let document_no = DocumentNo(document.doc_no);
        tracing::info!(
            document_no = %document_no,
            file_name = %package.file_name,
            "Document created"
        );
        ensure_not_cancelled(&cancel)?;

        let expires_at = upload.options.expiry.resolve(Utc::now())?;
        let link = self
            .create_shared_link(
                document_no,
                upload.options.password.as_deref(),
                expires_at,
                &package.file_name,
            )
            .await?;
        tracing::info!(
            document_no = %document_no,
            link_id = %link.link_id,
            protected = upload.options.is_protected(),
            expiry_days = upload.options.expiry.wire_days(),
            expiry_custom = upload.options.expiry.custom_iso8601().as_deref(),
            "Shared link created"
        );

        Ok(ShareReceipt {
            url: link.link_url,
            document_no,
            expires_at,
        })
    }

    async fn share_history(&self) -> AppResult<Vec<ShareHistoryEntry>> {
        let entries = self.shared_links_by_me().await?;
        Ok(entries.into_iter().map(ShareHistoryEntry::from).collect())
    }

    async fn revoke_shared_link(&self, link_id: &LinkId) -> AppResult<()> {
        ServiceClient::revoke_shared_link(self, link_id).await?;
        tracing::info!(link_id = %link_id, "Shared link revoked");
        Ok(())
    }

    async fn delete_document(&self, document_no: DocumentNo) -> AppResult<()> {
        ServiceClient::delete_document(self, document_no).await?;
        tracing::info!(document_no = %document_no, "Document deleted");
        Ok(())
    }
}
