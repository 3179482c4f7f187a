//! Share session controller.
//!
//! Owns the file selection and drives one upload-to-completion cycle at a
//! time:
//!
//! ```text
//! Idle --request--> Preparing --Started--> Uploading --Completed--> Completed
//!                       |                      |
//!                       +------cancel----------+--> Cancelled
//!                       +------Failed----------+--> Failed
//! Completed | Cancelled | Failed --acknowledge--> Idle
//! ```
//!
//! Entering `Preparing` locks the selection and the Share action; the lock
//! is released exactly once on the terminal transition. The selection is
//! cleared only on success.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use docshare_core::error::AppError;
use docshare_core::events::TransportEvent;
use docshare_core::result::AppResult;
use docshare_core::traits::DocumentService;
use docshare_core::types::{PendingFile, Progress, ShareOptions, ShareReceipt, UploadId};

use crate::selection::FileSelection;
use crate::transport::{UploadCanceller, UploadHandle, UploadTransport};

/// State of the share session.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// The share was requested; no bytes are known yet.
    Preparing,
    /// Bytes are being sent.
    Uploading(Progress),
    /// The link was created.
    Completed(ShareReceipt),
    /// The user cancelled.
    Cancelled,
    /// The share failed.
    Failed(AppError),
}

impl SessionState {
    /// Whether an upload is in flight.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Preparing | Self::Uploading(_))
    }

    /// Whether the session awaits acknowledgement of its outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Cancelled | Self::Failed(_))
    }

    /// Short state name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Preparing => "preparing",
            Self::Uploading(_) => "uploading",
            Self::Completed(_) => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed(_) => "failed",
        }
    }
}

/// Which UI actions are currently available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Affordances {
    /// The Share action.
    pub share_enabled: bool,
    /// Adding and removing files.
    pub selection_editable: bool,
    /// Changing password and expiry.
    pub settings_editable: bool,
}

/// Receives state changes of a [`ShareController`].
///
/// All methods default to no-ops.
pub trait SessionObserver: Send {
    /// The session state changed.
    fn state_changed(&mut self, _state: &SessionState, _affordances: Affordances) {}

    /// The selection changed.
    fn selection_changed(&mut self, _files: &[PendingFile], _affordances: Affordances) {}

    /// Controls were locked (`true`) or released (`false`).
    fn controls_locked(&mut self, _locked: bool) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Orchestrates file selection and share sessions.
pub struct ShareController {
    selection: FileSelection,
    transport: UploadTransport,
    state: SessionState,
    active: Option<UploadHandle>,
    locked: bool,
    observer: Box<dyn SessionObserver>,
}

impl std::fmt::Debug for ShareController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareController")
            .field("selection", &self.selection)
            .field("state", &self.state)
            .field("locked", &self.locked)
            .finish_non_exhaustive()
    }
}

impl ShareController {
    /// Create a controller over a document service.
    pub fn new(service: Arc<dyn DocumentService>) -> Self {
        Self {
            selection: FileSelection::new(),
            transport: UploadTransport::new(service),
            state: SessionState::Idle,
            active: None,
            locked: false,
            observer: Box::new(NoopObserver),
        }
    }

    /// Attach an observer.
    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current selection.
    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    /// Whether selection and settings are locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Available actions.
    pub fn affordances(&self) -> Affordances {
        let idle = matches!(self.state, SessionState::Idle);
        Affordances {
            share_enabled: idle && !self.selection.is_empty(),
            selection_editable: !self.locked,
            settings_editable: !self.locked,
        }
    }

    fn ensure_unlocked(&self) -> AppResult<()> {
        if self.locked {
            return Err(AppError::session_busy());
        }
        Ok(())
    }

    fn notify_selection(&mut self) {
        let affordances = self.affordances();
        self.observer
            .selection_changed(self.selection.list(), affordances);
    }

    fn set_state(&mut self, state: SessionState) {
        tracing::debug!(from = self.state.name(), to = state.name(), "Session state changed");
        self.state = state;
        let affordances = self.affordances();
        self.observer.state_changed(&self.state, affordances);
    }

    fn set_locked(&mut self, locked: bool) {
        if self.locked != locked {
            self.locked = locked;
            self.observer.controls_locked(locked);
        }
    }

    /// Add a file. Returns `false` for a duplicate.
    pub fn add_file(&mut self, file: PendingFile) -> AppResult<bool> {
        self.ensure_unlocked()?;
        let added = self.selection.add(file);
        if added {
            self.notify_selection();
        }
        Ok(added)
    }

    /// Resolve a filesystem path and add it.
    pub async fn add_path(&mut self, path: impl AsRef<Path>) -> AppResult<bool> {
        self.ensure_unlocked()?;
        let file = PendingFile::from_path(path).await?;
        self.add_file(file)
    }

    /// Remove the file at `index`.
    pub fn remove_file(&mut self, index: usize) -> AppResult<PendingFile> {
        self.ensure_unlocked()?;
        let removed = self.selection.remove(index)?;
        self.notify_selection();
        Ok(removed)
    }

    /// Remove every file.
    pub fn clear_files(&mut self) -> AppResult<()> {
        self.ensure_unlocked()?;
        self.selection.clear();
        self.notify_selection();
        Ok(())
    }

    /// Start sharing the current selection.
    ///
    /// Fails with `SessionBusy` unless the session is idle, with `NoFiles`
    /// when nothing is selected, and with `Validation` for an expiry that
    /// cannot be resolved; none of these changes any state.
    pub fn request(&mut self, options: ShareOptions) -> AppResult<UploadId> {
        if !matches!(self.state, SessionState::Idle) {
            return Err(AppError::session_busy());
        }
        if self.selection.is_empty() {
            return Err(AppError::no_files());
        }
        options.expiry.validate()?;

        self.set_locked(true);
        self.set_state(SessionState::Preparing);

        let handle = self
            .transport
            .start(self.selection.list().to_vec(), options);
        let id = handle.id();
        self.active = Some(handle);
        Ok(id)
    }

    /// Wait for the next event of the active upload.
    pub async fn next_event(&mut self) -> Option<TransportEvent> {
        match self.active.as_mut() {
            Some(handle) => handle.next_event().await,
            None => None,
        }
    }

    /// Apply an upload event to the session state.
    pub fn handle_event(&mut self, event: TransportEvent) {
        if !self.state.is_in_flight() {
            tracing::debug!(event = event.name(), "Ignoring event outside an upload");
            return;
        }

        match event {
            TransportEvent::Started { bytes_total } => {
                if matches!(self.state, SessionState::Preparing) {
                    self.set_state(SessionState::Uploading(Progress::start(bytes_total)));
                }
            }
            TransportEvent::Progress(progress) => {
                let advances = match &self.state {
                    SessionState::Uploading(current) => progress.bytes_sent >= current.bytes_sent,
                    _ => true,
                };
                if advances {
                    self.set_state(SessionState::Uploading(progress));
                }
            }
            TransportEvent::Completed(receipt) => {
                self.selection.clear();
                self.finish(SessionState::Completed(receipt));
                self.notify_selection();
            }
            TransportEvent::Failed(err) => self.finish(SessionState::Failed(err)),
            TransportEvent::Cancelled => self.finish(SessionState::Cancelled),
        }
    }

    fn finish(&mut self, state: SessionState) {
        self.active = None;
        self.set_locked(false);
        self.set_state(state);
    }

    /// Process events until the session leaves the in-flight states.
    pub async fn run_until_settled(&mut self) -> &SessionState {
        while self.state.is_in_flight() {
            match self.next_event().await {
                Some(event) => self.handle_event(event),
                None => {
                    self.finish(SessionState::Failed(AppError::internal(
                        "upload ended without a result",
                    )));
                }
            }
        }
        &self.state
    }

    /// Cancel the active upload. Returns `false` when nothing can be cancelled.
    pub fn cancel(&self) -> bool {
        match &self.active {
            Some(handle) if self.state.is_in_flight() => handle.cancel(),
            _ => false,
        }
    }

    /// A cancel trigger for the active upload.
    pub fn canceller(&self) -> Option<UploadCanceller> {
        self.active.as_ref().map(UploadHandle::canceller)
    }

    /// Return from a terminal state to idle. Returns `false` if not terminal.
    pub fn acknowledge(&mut self) -> bool {
        if !self.state.is_terminal() {
            return false;
        }
        self.set_state(SessionState::Idle);
        true
    }
}
