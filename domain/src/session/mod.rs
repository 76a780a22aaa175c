//! USSD session domain.
//!
//! - [`entities::Session`] - the state machine for one dialogue
//! - [`value_objects::SessionId`] - opaque dialogue identifier
//! - [`value_objects::SessionPhase`] - derived presentation state

pub mod entities;
pub mod value_objects;
