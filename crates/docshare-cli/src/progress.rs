//! Terminal rendering of a share session.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use docshare_core::types::PendingFile;
use docshare_session::{Affordances, SessionObserver, SessionState};

const BAR_TEMPLATE: &str =
    "{spinner:.cyan} {msg} [{bar:40.cyan/blue}] {percent}% {bytes}/{total_bytes} ({eta})";

/// Draws a progress bar while an upload is in flight.
#[derive(Debug)]
pub struct TerminalObserver {
    bar: ProgressBar,
}

impl TerminalObserver {
    /// Create an observer; a hidden one draws nothing.
    pub fn new(visible: bool) -> Self {
        let bar = ProgressBar::new(0);
        if !visible {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        Self { bar }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(BAR_TEMPLATE)
            .map(|style| style.progress_chars("█▉▊▋▌▍▎▏ "))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }
}

impl SessionObserver for TerminalObserver {
    fn state_changed(&mut self, state: &SessionState, _affordances: Affordances) {
        match state {
            SessionState::Preparing => {
                self.bar.set_style(ProgressStyle::default_spinner());
                self.bar.set_message("Preparing upload...");
                self.bar.enable_steady_tick(std::time::Duration::from_millis(100));
            }
            SessionState::Uploading(progress) => {
                if self.bar.length() != Some(progress.bytes_total) {
                    self.bar.set_style(Self::bar_style());
                    self.bar.set_length(progress.bytes_total);
                    self.bar.set_message("Uploading");
                }
                self.bar.set_position(progress.bytes_sent);
                if progress.percent == 100 {
                    self.bar.set_message("Creating link");
                }
            }
            SessionState::Completed(_) | SessionState::Cancelled | SessionState::Failed(_) => {
                self.bar.finish_and_clear();
            }
            SessionState::Idle => {}
        }
    }

    fn selection_changed(&mut self, files: &[PendingFile], _affordances: Affordances) {
        tracing::debug!(files = files.len(), "Selection changed");
    }
}
