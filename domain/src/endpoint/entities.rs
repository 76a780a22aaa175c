//! Endpoint entities: configured USSD callbacks a dialer can run against

use crate::core::error::DomainError;
use crate::dialect::kind::Dialect;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Unique identifier for a configured endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointId(String);

impl EndpointId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a new random EndpointId (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EndpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A configured USSD callback (Entity)
///
/// `dialect` is fixed for every session run against this endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub id: EndpointId,
    pub name: String,
    pub phone_number: String,
    pub callback_url: String,
    pub dialect: Dialect,
    /// Milliseconds since the Unix epoch
    pub created_at: u64,
}

impl Endpoint {
    /// Materialize a validated endpoint from user input
    pub fn create(
        id: EndpointId,
        draft: NewEndpoint,
        created_at: u64,
    ) -> Result<Self, DomainError> {
        draft.validate()?;
        Ok(Self {
            id,
            name: draft.name.trim().to_string(),
            phone_number: draft.phone_number.trim().to_string(),
            callback_url: draft.callback_url.trim().to_string(),
            dialect: draft.dialect,
            created_at,
        })
    }

    /// Check the fields a session relies on before any turn is attempted
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_name(&self.name)?;
        validate_phone_number(&self.phone_number)?;
        validate_callback_url(&self.callback_url)
    }

    /// Apply a partial update; `id` and `created_at` never change
    pub fn apply(&mut self, update: EndpointUpdate) -> Result<(), DomainError> {
        let mut next = self.clone();
        if let Some(name) = update.name {
            next.name = name.trim().to_string();
        }
        if let Some(phone_number) = update.phone_number {
            next.phone_number = phone_number.trim().to_string();
        }
        if let Some(callback_url) = update.callback_url {
            next.callback_url = callback_url.trim().to_string();
        }
        if let Some(dialect) = update.dialect {
            next.dialect = dialect;
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}

/// User input for a new endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEndpoint {
    pub name: String,
    pub phone_number: String,
    pub callback_url: String,
    pub dialect: Dialect,
}

impl NewEndpoint {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_name(&self.name)?;
        validate_phone_number(&self.phone_number)?;
        validate_callback_url(&self.callback_url)
    }
}

/// Partial update for an existing endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointUpdate {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub callback_url: Option<String>,
    pub dialect: Option<Dialect>,
}

impl EndpointUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone_number.is_none()
            && self.callback_url.is_none()
            && self.dialect.is_none()
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidEndpoint("name cannot be empty".to_string()));
    }
    Ok(())
}

fn validate_phone_number(phone_number: &str) -> Result<(), DomainError> {
    if phone_number.trim().is_empty() {
        return Err(DomainError::InvalidEndpoint(
            "phone number cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Require an absolute `http`/`https` URL with a host
pub fn validate_callback_url(url: &str) -> Result<(), DomainError> {
    let url = url.trim();
    let invalid = |reason: &str| DomainError::InvalidCallbackUrl(format!("{} ({})", url, reason));

    let parsed = Url::parse(url).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }
    Ok(())
}
