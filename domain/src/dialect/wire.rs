//! Wire-level payloads and codec errors

use crate::dialect::kind::Dialect;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Content types a gateway request can be sent with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    FormUrlEncoded,
}

impl ContentType {
    /// Value for the `Content-Type` header
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An encoded request body ready for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirePayload {
    pub content_type: ContentType,
    pub body: Vec<u8>,
}

impl WirePayload {
    /// Serialize `value` as a JSON body
    pub fn json<T: serde::Serialize>(value: &T) -> Result<Self, EncodeError> {
        Ok(Self {
            content_type: ContentType::Json,
            body: serde_json::to_vec(value)?,
        })
    }

    /// Build an `application/x-www-form-urlencoded` body, keeping field order
    pub fn form(fields: &[(&str, &str)]) -> Self {
        let body = fields
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        Self {
            content_type: ContentType::FormUrlEncoded,
            body: body.into_bytes(),
        }
    }

    /// Body as text, for logging
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Raw reply body returned by a gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireReply<'a> {
    body: &'a [u8],
}

impl<'a> WireReply<'a> {
    pub fn new(body: &'a [u8]) -> Self {
        Self { body }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.body
    }

    /// Interpret the body as UTF-8 text
    pub fn text(&self, dialect: Dialect) -> Result<&'a str, DecodeError> {
        std::str::from_utf8(self.body).map_err(|_| DecodeError::NotUtf8 { dialect })
    }

    /// Deserialize the body as JSON into the dialect's reply shape
    pub fn json<T: DeserializeOwned>(&self, dialect: Dialect) -> Result<T, DecodeError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Err(DecodeError::EmptyBody { dialect });
        }
        serde_json::from_slice(self.body).map_err(|e| DecodeError::Malformed {
            dialect,
            reason: e.to_string(),
        })
    }
}

/// Errors raised while encoding a turn request
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Failed to serialize request: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised when a reply does not match the dialect's expected shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{} reply is empty", dialect.display_name())]
    EmptyBody { dialect: Dialect },

    #[error("{} reply is not valid UTF-8", dialect.display_name())]
    NotUtf8 { dialect: Dialect },

    #[error("Unexpected {} reply: {reason}", dialect.display_name())]
    Malformed { dialect: Dialect, reason: String },
}
