//! Session entity: the state machine for one USSD dialogue

use crate::core::error::DomainError;
use crate::dialect::turn::{TurnResult, join_input};
use crate::session::value_objects::{SessionId, SessionPhase, SessionSnapshot};

/// The mutable state of one dialogue (Entity)
///
/// An idle session has no id, an empty history and no error. Starting assigns
/// a fresh id; every submitted token is appended to `history` before its turn
/// is sent; ending resets everything back to idle.
#[derive(Debug, Clone)]
pub struct Session {
    session_id: Option<SessionId>,
    service_code: String,
    history: Vec<String>,
    current_message: String,
    is_loading: bool,
    error: Option<String>,
    continue_session: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create an idle session
    pub fn new() -> Self {
        Self {
            session_id: None,
            service_code: String::new(),
            history: Vec::new(),
            current_message: String::new(),
            is_loading: false,
            error: None,
            continue_session: true,
        }
    }

    // ==================== Transitions ====================

    /// Begin a new dialogue and return its id.
    ///
    /// Any dialogue already in progress is discarded. The session is left
    /// loading, waiting for the opening turn's reply.
    pub fn start_session(&mut self, service_code: impl Into<String>) -> SessionId {
        let session_id = SessionId::generate();
        *self = Self {
            session_id: Some(session_id.clone()),
            service_code: service_code.into(),
            is_loading: true,
            ..Self::new()
        };
        session_id
    }

    /// Record the token the user just submitted and mark the turn in flight.
    pub fn record_turn_submission(&mut self, input: impl Into<String>) -> Result<(), DomainError> {
        let session_id = self.require_active("record a turn submission")?;
        match self.phase() {
            SessionPhase::Loading => return Err(DomainError::TurnInFlight(session_id)),
            SessionPhase::Terminal => return Err(DomainError::SessionEnded(session_id)),
            SessionPhase::AwaitingInput | SessionPhase::Idle => {}
        }

        self.history.push(input.into());
        self.is_loading = true;
        self.error = None;
        Ok(())
    }

    /// Apply the gateway's reply to the turn in flight.
    pub fn apply_turn_result(&mut self, result: &TurnResult) -> Result<SessionPhase, DomainError> {
        self.require_in_flight("apply a turn result")?;

        self.current_message = result.message.clone();
        self.continue_session = result.continue_session;
        self.is_loading = false;
        self.error = None;
        Ok(self.phase())
    }

    /// Record that the turn in flight failed.
    ///
    /// The dialogue stays open so the user can send again or cancel. History
    /// keeps the token that was being sent.
    pub fn apply_turn_failure(&mut self, error: impl Into<String>) -> Result<(), DomainError> {
        self.require_in_flight("apply a turn failure")?;

        self.is_loading = false;
        self.continue_session = true;
        self.error = Some(error.into());
        Ok(())
    }

    /// Discard the dialogue, returning the id it had (if any).
    pub fn end_session(&mut self) -> Option<SessionId> {
        let ended = self.session_id.take();
        *self = Self::new();
        ended
    }

    // ==================== Queries ====================

    pub fn phase(&self) -> SessionPhase {
        if self.session_id.is_none() {
            SessionPhase::Idle
        } else if self.is_loading {
            SessionPhase::Loading
        } else if self.error.is_some() || self.continue_session {
            SessionPhase::AwaitingInput
        } else {
            SessionPhase::Terminal
        }
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// Whether `id` names the dialogue currently held by this session
    pub fn is_current(&self, id: &SessionId) -> bool {
        self.session_id.as_ref() == Some(id)
    }

    pub fn is_active(&self) -> bool {
        self.session_id.is_some()
    }

    pub fn service_code(&self) -> &str {
        &self.service_code
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Every token entered so far, joined by `*`
    pub fn full_input(&self) -> String {
        join_input(&self.history)
    }

    pub fn current_message(&self) -> &str {
        &self.current_message
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            service_code: self.service_code.clone(),
            history: self.history.clone(),
            current_message: self.current_message.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
            phase: self.phase(),
        }
    }

    fn require_active(&self, operation: &'static str) -> Result<String, DomainError> {
        self.session_id
            .as_ref()
            .map(|id| id.to_string())
            .ok_or(DomainError::NoActiveSession(operation))
    }

    fn require_in_flight(&self, operation: &'static str) -> Result<(), DomainError> {
        let session_id = self.require_active(operation)?;
        if !self.is_loading {
            return Err(DomainError::NoTurnInFlight(session_id));
        }
        Ok(())
    }
}
