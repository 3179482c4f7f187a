//! Byte-level upload progress.
//!
//! The collaborator receives a [`ProgressReporter`] and pushes byte counts
//! into it; the reporter turns them into [`ProgressSignal`]s, emitting only
//! when the integer percentage changes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A progress snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    /// Integer percentage in `0..=100`.
    pub percent: u8,
    /// Bytes sent so far.
    pub bytes_sent: u64,
    /// Total bytes of the upload body.
    pub bytes_total: u64,
}

impl Progress {
    /// Build a snapshot, deriving the percentage.
    pub fn new(bytes_sent: u64, bytes_total: u64) -> Self {
        let bytes_sent = bytes_sent.min(bytes_total);
        let percent = if bytes_total == 0 {
            100
        } else {
            ((bytes_sent as u128 * 100) / bytes_total as u128) as u8
        };
        Self {
            percent,
            bytes_sent,
            bytes_total,
        }
    }

    /// The zero snapshot for a body of `bytes_total` bytes.
    pub fn start(bytes_total: u64) -> Self {
        Self {
            percent: 0,
            bytes_sent: 0,
            bytes_total,
        }
    }

    /// The completed snapshot for a body of `bytes_total` bytes.
    pub fn complete(bytes_total: u64) -> Self {
        Self {
            percent: 100,
            bytes_sent: bytes_total,
            bytes_total,
        }
    }
}

/// Signals pushed by a [`ProgressReporter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressSignal {
    /// The body size is known and sending begins.
    Started {
        /// Total bytes of the upload body.
        bytes_total: u64,
    },
    /// The integer percentage advanced.
    Advanced(Progress),
}

#[derive(Debug, Default)]
struct ReporterState {
    total: AtomicU64,
    sent: AtomicU64,
    last_percent: AtomicU64,
}

/// Push-style progress sink handed to the document service.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    state: Arc<ReporterState>,
    tx: mpsc::UnboundedSender<ProgressSignal>,
}

impl ProgressReporter {
    /// Create a reporter and the receiver its signals arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let reporter = Self {
            state: Arc::new(ReporterState::default()),
            tx,
        };
        (reporter, rx)
    }

    /// A reporter whose signals go nowhere.
    pub fn detached() -> Self {
        Self::channel().0
    }

    /// Announce the total size and reset the counters.
    pub fn begin(&self, bytes_total: u64) {
        self.state.total.store(bytes_total, Ordering::SeqCst);
        self.state.sent.store(0, Ordering::SeqCst);
        self.state.last_percent.store(0, Ordering::SeqCst);
        let _ = self.tx.send(ProgressSignal::Started { bytes_total });
    }

    /// Record `n` more bytes sent; emits only when the percentage changes.
    pub fn advance(&self, n: u64) {
        let total = self.state.total.load(Ordering::SeqCst);
        let sent = self.state.sent.fetch_add(n, Ordering::SeqCst) + n;
        let progress = Progress::new(sent, total);

        let percent = u64::from(progress.percent);
        let previous = self.state.last_percent.fetch_max(percent, Ordering::SeqCst);
        if percent > previous {
            let _ = self.tx.send(ProgressSignal::Advanced(progress));
        }
    }

    /// Bytes recorded so far.
    pub fn bytes_sent(&self) -> u64 {
        self.state.sent.load(Ordering::SeqCst)
    }
}
