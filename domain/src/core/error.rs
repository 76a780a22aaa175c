//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Covers two families: configuration problems that must be reported before
/// a session starts, and session contract violations raised by the state
/// machine when an operation is invoked in a state where it is undefined.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No active session: cannot {0}")]
    NoActiveSession(&'static str),

    #[error("A turn is already in flight for session {0}")]
    TurnInFlight(String),

    #[error("No turn is in flight for session {0}")]
    NoTurnInFlight(String),

    #[error("Session {0} has ended; acknowledge or cancel it first")]
    SessionEnded(String),

    #[error("Input cannot be empty")]
    EmptyInput,

    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),

    #[error("Invalid callback URL: {0}")]
    InvalidCallbackUrl(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Invalid service code: {0}")]
    InvalidServiceCode(String),
}

impl DomainError {
    /// Check if this error is a configuration problem (raised before any turn)
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DomainError::UnknownDialect(_)
                | DomainError::InvalidCallbackUrl(_)
                | DomainError::InvalidEndpoint(_)
                | DomainError::InvalidServiceCode(_)
        )
    }

    /// Check if this error means the caller broke the session contract
    ///
    /// These indicate a bug in whatever drives the state machine, not a
    /// runtime failure of the gateway.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            DomainError::NoActiveSession(_) | DomainError::NoTurnInFlight(_)
        )
    }
}
