//! Progress reporting while a turn is in flight

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use ussd_application::ports::progress::TurnProgressNotifier;
use ussd_domain::{Dialect, SessionId};

/// Spinner shown between sending a turn and its reply
pub struct TurnSpinner {
    bar: Mutex<Option<ProgressBar>>,
}

impl TurnSpinner {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.bar.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

impl Default for TurnSpinner {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgressNotifier for TurnSpinner {
    fn on_turn_start(&self, _session_id: &SessionId, dialect: Dialect, is_new_session: bool) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message(if is_new_session {
            format!("Dialing via {}...", dialect.display_name())
        } else {
            "Sending...".to_string()
        });
        pb.enable_steady_tick(Duration::from_millis(80));

        if let Some(previous) = self
            .bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_turn_finished(&self, _session_id: &SessionId, _succeeded: bool) {
        if let Some(pb) = self.take_bar() {
            pb.finish_and_clear();
        }
    }
}
