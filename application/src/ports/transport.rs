//! USSD transport port
//!
//! Defines how the application layer reaches a gateway callback over HTTP.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur before a gateway produces any HTTP response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// One outbound callback request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub url: String,
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub timeout: Duration,
}

/// Whatever the gateway answered, successful or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Request/response capability with a bounded wait.
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait UssdTransport: Send + Sync {
    /// POST `request.body` to `request.url` and return the raw response
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
