//! Domain layer for ussd-sim
//!
//! This crate contains the session protocol engine: the dialect codecs that
//! translate turns to and from gateway wire formats, and the session state
//! machine that tracks one dialogue. It performs no I/O.
//!
//! # Core Concepts
//!
//! ## Dialects
//!
//! A dialect is one gateway vendor's wire format and continuation convention:
//!
//! - **Arkesel**: JSON, boolean `continueSession`
//! - **Africa's Talking**: form fields in, `CON `/`END ` text out
//! - **Hollatags**: JSON, `session_operation` tag
//!
//! ## Sessions
//!
//! A [`Session`] moves between `Idle`, `Loading`, `AwaitingInput` and
//! `Terminal`. Only one turn may be in flight at a time.

pub mod core;
pub mod dialect;
pub mod endpoint;
pub mod session;

// Re-export commonly used types
pub use core::{error::DomainError, service_code::ServiceCode};
pub use dialect::{
    codec::DialectCodec,
    kind::Dialect,
    turn::{TurnRequest, TurnResult, join_input},
    wire::{ContentType, DecodeError, EncodeError, WirePayload, WireReply},
};
pub use endpoint::entities::{Endpoint, EndpointId, EndpointUpdate, NewEndpoint};
pub use session::{
    entities::Session,
    value_objects::{SessionId, SessionPhase, SessionSnapshot},
};
