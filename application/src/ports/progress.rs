//! Progress notification port
//!
//! Defines the interface for reporting turn progress while a gateway
//! round trip is outstanding.

use ussd_domain::{Dialect, SessionId};

/// Callback for progress updates during a turn
///
/// Implementations live in the presentation layer (spinners, status lines).
pub trait TurnProgressNotifier: Send + Sync {
    /// Called right before the request is handed to the transport
    fn on_turn_start(&self, session_id: &SessionId, dialect: Dialect, is_new_session: bool);

    /// Called once the turn resolved, whatever the outcome
    fn on_turn_finished(&self, session_id: &SessionId, succeeded: bool);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoTurnProgress;

impl TurnProgressNotifier for NoTurnProgress {
    fn on_turn_start(&self, _session_id: &SessionId, _dialect: Dialect, _is_new_session: bool) {}
    fn on_turn_finished(&self, _session_id: &SessionId, _succeeded: bool) {}
}
