//! reqwest-backed implementation of the [`UssdTransport`] port

use async_trait::async_trait;
use std::time::Instant;
use tracing::debug;
use ussd_application::ports::transport::{
    TransportError, TransportRequest, TransportResponse, UssdTransport,
};

const USER_AGENT: &str = concat!("ussd-sim/", env!("CARGO_PKG_VERSION"));

/// Posts encoded turns to gateway callbacks over HTTP(S).
///
/// Non-2xx responses are returned as-is; deciding what they mean is the
/// orchestrator's job.
#[derive(Clone)]
pub struct HttpUssdTransport {
    client: reqwest::Client,
}

impl HttpUssdTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Ok(Self { client })
    }

    /// Use a preconfigured client (proxies, TLS roots, ...)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn classify(error: reqwest::Error, request: &TransportRequest) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout(request.timeout)
        } else if error.is_builder() {
            TransportError::InvalidRequest(error.to_string())
        } else {
            TransportError::Connection(error.to_string())
        }
    }
}

#[async_trait]
impl UssdTransport for HttpUssdTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| TransportError::InvalidRequest(format!("{}: {}", request.url, e)))?;

        let start = Instant::now();
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, request.content_type)
            .timeout(request.timeout)
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| Self::classify(e, &request))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::classify(e, &request))?;

        debug!(
            "POST {} -> {} ({} bytes, {}ms)",
            request.url,
            status,
            body.len(),
            start.elapsed().as_millis()
        );

        Ok(TransportResponse::new(status, body.to_vec()))
    }
}
