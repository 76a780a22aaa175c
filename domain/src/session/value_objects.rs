//! Session value objects.
//!
//! # Identifiers
//! - [`SessionId`] - Opaque identifier shared by every turn of one dialogue
//!
//! # Views
//! - [`SessionPhase`] - Presentation state derived from the session fields
//! - [`SessionSnapshot`] - Read-only copy of a session for rendering

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for a USSD dialogue.
///
/// Generated once when the session starts and sent unchanged with every turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a SessionId from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a new random SessionId (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for SessionId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a session currently stands, as far as the user is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No dialogue is active.
    Idle,
    /// A turn's round trip is outstanding.
    Loading,
    /// A message (or a turn error) is shown and the gateway expects more input.
    AwaitingInput,
    /// The gateway ended the dialogue; waiting for the user to acknowledge.
    Terminal,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Loading => "loading",
            SessionPhase::AwaitingInput => "awaiting_input",
            SessionPhase::Terminal => "terminal",
        }
    }

    /// Whether a dialogue exists in this phase.
    pub fn is_active(&self) -> bool {
        !matches!(self, SessionPhase::Idle)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read-only copy of a session's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Option<SessionId>,
    pub service_code: String,
    pub history: Vec<String>,
    pub current_message: String,
    pub is_loading: bool,
    pub error: Option<String>,
    pub phase: SessionPhase,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_phase_activity() {
        assert!(!SessionPhase::Idle.is_active());
        assert!(SessionPhase::Loading.is_active());
        assert!(SessionPhase::Terminal.is_active());
        assert_eq!(SessionPhase::AwaitingInput.to_string(), "awaiting_input");
    }
}
