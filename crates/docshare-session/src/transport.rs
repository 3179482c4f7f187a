//! Upload transport.
//!
//! [`UploadTransport::start`] spawns one background task that runs the
//! document service's share operation and relays its progress. Events
//! reach the caller through an [`UploadHandle`]; a shared outlet guarantees
//! that byte counts never regress and that exactly one terminal event is
//! delivered, whichever of success, failure, or cancellation comes first.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use docshare_core::error::AppError;
use docshare_core::events::TransportEvent;
use docshare_core::traits::DocumentService;
use docshare_core::types::{
    PendingFile, Progress, ProgressReporter, ProgressSignal, ShareOptions, ShareReceipt,
    ShareUpload, UploadId,
};

#[derive(Debug)]
struct OutletState {
    tx: Option<mpsc::UnboundedSender<TransportEvent>>,
    started: bool,
    bytes_total: u64,
    last: Progress,
}

/// Single exit of every event of one upload.
#[derive(Debug)]
struct Outlet {
    state: Mutex<OutletState>,
}

impl Outlet {
    fn new(tx: mpsc::UnboundedSender<TransportEvent>) -> Self {
        Self {
            state: Mutex::new(OutletState {
                tx: Some(tx),
                started: false,
                bytes_total: 0,
                last: Progress::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, OutletState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn forward(&self, signal: ProgressSignal) {
        let mut state = self.lock();
        match signal {
            ProgressSignal::Started { bytes_total } => Self::start_locked(&mut state, bytes_total),
            ProgressSignal::Advanced(progress) => Self::advance_locked(&mut state, progress),
        }
    }

    fn start_locked(state: &mut OutletState, bytes_total: u64) {
        if state.started {
            return;
        }
        if let Some(tx) = &state.tx {
            state.started = true;
            state.bytes_total = bytes_total;
            state.last = Progress::start(bytes_total);
            let _ = tx.send(TransportEvent::Started { bytes_total });
        }
    }

    fn advance_locked(state: &mut OutletState, progress: Progress) {
        if !state.started || progress.bytes_sent < state.last.bytes_sent {
            return;
        }
        if progress.percent <= state.last.percent && progress.bytes_sent == state.last.bytes_sent {
            return;
        }
        if let Some(tx) = &state.tx {
            state.last = progress;
            let _ = tx.send(TransportEvent::Progress(progress));
        }
    }

    /// Deliver a terminal event unless one was already delivered.
    fn settle(&self, event: TransportEvent) -> bool {
        let mut state = self.lock();
        match state.tx.take() {
            Some(tx) => {
                let _ = tx.send(event);
                true
            }
            None => false,
        }
    }

    /// Deliver success, preceded by a 100% progress event.
    fn complete(&self, receipt: ShareReceipt, bytes_total_hint: u64) -> bool {
        let mut state = self.lock();
        if state.tx.is_none() {
            return false;
        }
        if !state.started {
            Self::start_locked(&mut state, bytes_total_hint);
        }
        if state.last.percent < 100 {
            let total = state.bytes_total;
            Self::advance_locked(&mut state, Progress::complete(total));
        }
        match state.tx.take() {
            Some(tx) => {
                let _ = tx.send(TransportEvent::Completed(receipt));
                true
            }
            None => false,
        }
    }

    fn is_settled(&self) -> bool {
        self.lock().tx.is_none()
    }
}

/// Cloneable cancel trigger of one upload.
#[derive(Debug, Clone)]
pub struct UploadCanceller {
    id: UploadId,
    token: CancellationToken,
    outlet: Arc<Outlet>,
}

impl UploadCanceller {
    /// Cancel the upload.
    ///
    /// Returns `false` when a terminal event was already delivered; in that
    /// case nothing changes. Otherwise `Cancelled` is delivered, the
    /// background work is signalled, and no further event follows.
    pub fn cancel(&self) -> bool {
        if !self.outlet.settle(TransportEvent::Cancelled) {
            tracing::debug!(upload_id = %self.id, "Cancel ignored, upload already settled");
            return false;
        }
        self.token.cancel();
        tracing::info!(upload_id = %self.id, "Upload cancelled");
        true
    }
}

/// Caller side of an upload in flight.
#[derive(Debug)]
pub struct UploadHandle {
    canceller: UploadCanceller,
    events: mpsc::UnboundedReceiver<TransportEvent>,
    task: Option<JoinHandle<()>>,
}

impl UploadHandle {
    /// Identifier of this upload.
    pub fn id(&self) -> UploadId {
        self.canceller.id
    }

    /// Cancel the upload; see [`UploadCanceller::cancel`].
    pub fn cancel(&self) -> bool {
        self.canceller.cancel()
    }

    /// A cancel trigger usable while the handle is borrowed elsewhere.
    pub fn canceller(&self) -> UploadCanceller {
        self.canceller.clone()
    }

    /// Whether the terminal event has been delivered.
    pub fn is_settled(&self) -> bool {
        self.canceller.outlet.is_settled()
    }

    /// Wait for the next event; `None` once the terminal event was consumed.
    pub async fn next_event(&mut self) -> Option<TransportEvent> {
        let joined = match self.task.as_mut() {
            None => return self.events.recv().await,
            Some(task) => tokio::select! {
                biased;
                event = self.events.recv() => return event,
                joined = task => joined,
            },
        };
        self.task = None;

        if let Err(err) = joined {
            if err.is_panic() {
                tracing::error!(upload_id = %self.id(), "Upload task panicked");
                self.canceller
                    .outlet
                    .settle(TransportEvent::Failed(AppError::internal("upload task panicked")));
            }
        }
        self.events.recv().await
    }
}

impl Drop for UploadHandle {
    fn drop(&mut self) {
        self.canceller.token.cancel();
    }
}

/// Starts uploads against a document service.
#[derive(Debug, Clone)]
pub struct UploadTransport {
    service: Arc<dyn DocumentService>,
}

impl UploadTransport {
    /// Create a transport over a document service.
    pub fn new(service: Arc<dyn DocumentService>) -> Self {
        Self { service }
    }

    /// Start uploading in the background and return at once.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, files: Vec<PendingFile>, options: ShareOptions) -> UploadHandle {
        let id = UploadId::new();
        let (tx, events) = mpsc::unbounded_channel();
        let outlet = Arc::new(Outlet::new(tx));
        let token = CancellationToken::new();

        tracing::info!(
            upload_id = %id,
            binding = self.service.binding_name(),
            files = files.len(),
            protected = options.is_protected(),
            expiry = %options.expiry,
            "Starting upload"
        );

        let task = tokio::spawn(relay(
            Arc::clone(&self.service),
            ShareUpload { files, options },
            Arc::clone(&outlet),
            token.clone(),
            id,
        ));

        UploadHandle {
            canceller: UploadCanceller { id, token, outlet },
            events,
            task: Some(task),
        }
    }
}

async fn relay(
    service: Arc<dyn DocumentService>,
    upload: ShareUpload,
    outlet: Arc<Outlet>,
    cancel: CancellationToken,
    id: UploadId,
) {
    let (reporter, mut signals) = ProgressReporter::channel();
    let bytes_total_hint = upload.total_size();
    let work = service.share_files(upload, reporter, cancel.clone());
    tokio::pin!(work);

    let result = loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break None,
            Some(signal) = signals.recv() => outlet.forward(signal),
            result = &mut work => break Some(result),
        }
    };

    let Some(result) = result else {
        tracing::debug!(upload_id = %id, "Relay stopped after cancellation");
        return;
    };

    while let Ok(signal) = signals.try_recv() {
        outlet.forward(signal);
    }

    match result {
        Ok(receipt) => {
            tracing::info!(
                upload_id = %id,
                document_no = %receipt.document_no,
                "Upload completed"
            );
            outlet.complete(receipt, bytes_total_hint);
        }
        Err(err) if err.is_cancelled() => {
            outlet.settle(TransportEvent::Cancelled);
        }
        Err(err) => {
            tracing::warn!(upload_id = %id, error = %err, "Upload failed");
            outlet.settle(TransportEvent::Failed(err));
        }
    }
}
