//! Transcript sink for dialer sessions.
//!
//! The orchestrator emits one [`ConversationEvent`] per step of a USSD
//! dialogue: `session_started`, `turn_sent`, then one of `turn_completed`,
//! `turn_failed` or `turn_discarded`, and finally `session_ended`.
//! Diagnostics still go through `tracing`; a transcript is the replayable
//! record of what was sent to the callback and what came back.

use serde_json::Value;

/// One transcript record.
///
/// The sink stamps the time; the orchestrator only supplies the kind and
/// the session fields (`session_id`, request body, reply message).
pub struct ConversationEvent {
    /// Record kind, e.g. `turn_sent`
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Destination for transcript records.
///
/// May be called while the orchestrator holds its session state, so
/// implementations must not block on the dialer. Write failures stay
/// inside the implementation and never fail a turn.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Drops every record; used when no transcript path is configured.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
