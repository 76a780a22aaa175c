//! Gateway dialects (the adapter registry).
//!
//! Each dialect differs along three independent axes: body encoding (JSON or
//! form fields in, JSON or text out), whether the gateway wants the latest
//! token or the whole input trail, and how continuation is signalled
//! (boolean field, text prefix or operation tag).
//!
//! - [`kind::Dialect`] - the closed set of supported gateways
//! - [`codec::DialectCodec`] - encode/decode capability, one impl per dialect
//! - [`turn::TurnRequest`] / [`turn::TurnResult`] - dialect-agnostic turn types
//! - [`wire`] - encoded payloads and codec errors

pub mod africas_talking;
pub mod arkesel;
pub mod codec;
pub mod hollatags;
pub mod kind;
pub mod turn;
pub mod wire;

/// Network marker sent to gateways that expect an operator name
pub const SIMULATED_NETWORK: &str = "SIM";
