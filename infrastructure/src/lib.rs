//! Infrastructure layer for ussd-sim
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the HTTP transport, the endpoint catalog,
//! the transcript logger, and configuration file loading.

pub mod catalog;
pub mod config;
pub mod http;
pub mod logging;

// Re-export commonly used types
pub use catalog::JsonEndpointCatalog;
pub use config::{
    APP_DIR, ConfigLoader, ConfigValidationError, FileBehaviorConfig, FileCatalogConfig,
    FileConfig, FileEndpointConfig, FileLoggingConfig,
};
pub use http::HttpUssdTransport;
pub use logging::JsonlConversationLogger;
