//! # docshare-session
//!
//! Client-side orchestration of sharing: the file selection store, the
//! upload transport with progress and cancellation, the share session
//! state machine, and the share history manager.

pub mod controller;
pub mod history;
pub mod selection;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{Affordances, NoopObserver, SessionObserver, SessionState, ShareController};
pub use history::{ConfirmGate, FixedAnswer, HistoryManager, HistoryView, MutationOutcome};
pub use selection::FileSelection;
pub use transport::{UploadCanceller, UploadHandle, UploadTransport};
