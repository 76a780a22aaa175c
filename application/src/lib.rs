//! Application layer for ussd-sim
//!
//! This crate contains the turn orchestrator, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::BehaviorConfig;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    endpoint_catalog::{CatalogError, EndpointCatalog},
    progress::{NoTurnProgress, TurnProgressNotifier},
    transport::{TransportError, TransportRequest, TransportResponse, UssdTransport},
};
pub use use_cases::dial_turn::{
    DialAction, DialTurnError, DialTurnUseCase, TurnError, TurnOutcome,
};
