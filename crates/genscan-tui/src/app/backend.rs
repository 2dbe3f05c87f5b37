use genscan_core::Applied;

use super::App;
use crate::tui_event::BackendEvent;

impl App {
    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::SubmissionFinished(outcome) => {
                let seq = outcome.seq;
                match self.session.apply(outcome) {
                    Applied::Succeeded(n) | Applied::Failed(n) => self.notify(n),
                    Applied::Superseded => {
                        tracing::debug!(seq, "ignored stale submission outcome");
                    }
                }
            }
        }
    }
}
