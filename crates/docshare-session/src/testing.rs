//! Scripted document service for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use docshare_core::error::AppError;
use docshare_core::result::AppResult;
use docshare_core::traits::DocumentService;
use docshare_core::types::{
    DocumentNo, LinkId, ProgressReporter, ShareHistoryEntry, ShareReceipt, ShareUpload,
};

#[derive(Debug, Clone)]
pub enum ShareScript {
    /// Report the steps, then succeed.
    Succeed { total: u64, steps: Vec<u64> },
    /// Report the steps, then wait for release or cancellation.
    Hold { total: u64, steps: Vec<u64> },
    /// Fail before sending anything.
    Fail(AppError),
    /// Succeed without reporting any progress.
    SilentSuccess,
}

impl ShareScript {
    pub fn succeed(total: u64, steps: &[u64]) -> Self {
        Self::Succeed {
            total,
            steps: steps.to_vec(),
        }
    }

    pub fn hold(total: u64, steps: &[u64]) -> Self {
        Self::Hold {
            total,
            steps: steps.to_vec(),
        }
    }

    pub fn fail(err: AppError) -> Self {
        Self::Fail(err)
    }

    pub fn silent_success() -> Self {
        Self::SilentSuccess
    }
}

#[derive(Debug)]
pub struct ScriptedService {
    script: ShareScript,
    release: Notify,
    share_calls: AtomicUsize,
    token: Mutex<Option<CancellationToken>>,
    history: Mutex<AppResult<Vec<ShareHistoryEntry>>>,
    revoked: Mutex<Vec<LinkId>>,
    deleted: Mutex<Vec<DocumentNo>>,
}

impl ScriptedService {
    pub fn new(script: ShareScript) -> Arc<Self> {
        Arc::new(Self {
            script,
            release: Notify::new(),
            share_calls: AtomicUsize::new(0),
            token: Mutex::new(None),
            history: Mutex::new(Ok(Vec::new())),
            revoked: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        })
    }

    pub fn set_history(&self, history: AppResult<Vec<ShareHistoryEntry>>) {
        *self.history.lock().unwrap() = history;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    pub fn share_calls(&self) -> usize {
        self.share_calls.load(Ordering::SeqCst)
    }

    pub fn cancel_signalled(&self) -> bool {
        self.token
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    pub fn revoked(&self) -> Vec<LinkId> {
        self.revoked.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<DocumentNo> {
        self.deleted.lock().unwrap().clone()
    }

    fn receipt() -> ShareReceipt {
        ShareReceipt {
            url: "https://docs.example.com/s/abc".to_string(),
            document_no: DocumentNo(101),
            expires_at: None,
        }
    }
}

#[async_trait]
impl DocumentService for ScriptedService {
    fn binding_name(&self) -> &str {
        "scripted"
    }

    async fn check_access(&self) -> AppResult<()> {
        Ok(())
    }

    async fn share_files(
        &self,
        _upload: ShareUpload,
        progress: ProgressReporter,
        cancel: CancellationToken,
    ) -> AppResult<ShareReceipt> {
        self.share_calls.fetch_add(1, Ordering::SeqCst);
        *self.token.lock().unwrap() = Some(cancel.clone());

        match &self.script {
            ShareScript::Succeed { total, steps } => {
                progress.begin(*total);
                for step in steps {
                    progress.advance(*step);
                    tokio::task::yield_now().await;
                }
                Ok(Self::receipt())
            }
            ShareScript::Hold { total, steps } => {
                progress.begin(*total);
                for step in steps {
                    progress.advance(*step);
                    tokio::task::yield_now().await;
                }
                tokio::select! {
                    _ = cancel.cancelled() => Err(AppError::cancelled()),
                    _ = self.release.notified() => Ok(Self::receipt()),
                }
            }
            ShareScript::Fail(err) => Err(err.clone()),
            ShareScript::SilentSuccess => Ok(Self::receipt()),
        }
    }

    async fn share_history(&self) -> AppResult<Vec<ShareHistoryEntry>> {
        self.history.lock().unwrap().clone()
    }

    async fn revoke_shared_link(&self, link_id: &LinkId) -> AppResult<()> {
        self.revoked.lock().unwrap().push(link_id.clone());
        Ok(())
    }

    async fn delete_document(&self, document_no: DocumentNo) -> AppResult<()> {
        self.deleted.lock().unwrap().push(document_no);
        Ok(())
    }
}
