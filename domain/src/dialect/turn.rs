//! Dialect-agnostic turn types

use crate::session::value_objects::SessionId;
use serde::{Deserialize, Serialize};

/// Separator between tokens in the cumulative input trail
pub const INPUT_SEPARATOR: &str = "*";

/// The abstract input to one protocol turn.
///
/// Each dialect picks the fields it needs: some want only the latest token
/// (`input`), others the whole trail (`full_input`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub session_id: SessionId,
    pub phone_number: String,
    pub service_code: String,
    /// Token entered for this turn; empty on the opening turn
    pub input: String,
    /// Every token entered so far this session, joined by `*`
    pub full_input: String,
    pub is_new_session: bool,
}

impl TurnRequest {
    /// Build the request that opens a dialogue
    pub fn opening(
        session_id: SessionId,
        phone_number: impl Into<String>,
        service_code: impl Into<String>,
    ) -> Self {
        Self {
            session_id,
            phone_number: phone_number.into(),
            service_code: service_code.into(),
            input: String::new(),
            full_input: String::new(),
            is_new_session: true,
        }
    }

    /// Build a follow-up request.
    ///
    /// `history` must already contain `input` as its last element.
    pub fn follow_up(
        session_id: SessionId,
        phone_number: impl Into<String>,
        service_code: impl Into<String>,
        input: impl Into<String>,
        history: &[String],
    ) -> Self {
        Self {
            session_id,
            phone_number: phone_number.into(),
            service_code: service_code.into(),
            input: input.into(),
            full_input: join_input(history),
            is_new_session: false,
        }
    }
}

/// Join input tokens into the cumulative `*`-separated trail
pub fn join_input(history: &[String]) -> String {
    history.join(INPUT_SEPARATOR)
}

/// The normalized output of one protocol turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    pub message: String,
    pub continue_session: bool,
}

impl TurnResult {
    /// A result that expects another turn
    pub fn continues(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            continue_session: true,
        }
    }

    /// A result that concludes the dialogue
    pub fn ends(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            continue_session: false,
        }
    }
}
