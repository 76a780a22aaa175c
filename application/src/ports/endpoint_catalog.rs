//! Endpoint catalog port
//!
//! Defines how configured endpoints ("instances") are listed, looked up and
//! edited. Implementations live in the infrastructure layer.

use thiserror::Error;
use ussd_domain::{DomainError, Endpoint, EndpointUpdate, NewEndpoint};

/// Errors that can occur during catalog operations
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Endpoint not found: {0}")]
    NotFound(String),

    #[error("Endpoint name is ambiguous: {0}")]
    Ambiguous(String),

    #[error("Endpoint {0} is defined in a config file and cannot be modified")]
    ReadOnly(String),

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("Catalog storage error: {0}")]
    Storage(String),
}

/// Catalog of configured endpoints
pub trait EndpointCatalog: Send + Sync {
    /// All endpoints, newest first
    fn list(&self) -> Result<Vec<Endpoint>, CatalogError>;

    /// Look up an endpoint by id
    fn get(&self, id: &str) -> Result<Endpoint, CatalogError> {
        self.list()?
            .into_iter()
            .find(|e| e.id.as_str() == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Look up an endpoint by id, falling back to a case-insensitive name match
    fn find(&self, key: &str) -> Result<Endpoint, CatalogError> {
        let endpoints = self.list()?;
        if let Some(endpoint) = endpoints.iter().find(|e| e.id.as_str() == key) {
            return Ok(endpoint.clone());
        }

        let mut by_name = endpoints
            .into_iter()
            .filter(|e| e.name.eq_ignore_ascii_case(key.trim()));
        match (by_name.next(), by_name.next()) {
            (Some(endpoint), None) => Ok(endpoint),
            (Some(_), Some(_)) => Err(CatalogError::Ambiguous(key.to_string())),
            (None, _) => Err(CatalogError::NotFound(key.to_string())),
        }
    }

    /// Add a new endpoint and return it with its generated id
    fn add(&self, endpoint: NewEndpoint) -> Result<Endpoint, CatalogError>;

    /// Apply a partial update and return the updated endpoint
    fn update(&self, id: &str, update: EndpointUpdate) -> Result<Endpoint, CatalogError>;

    /// Remove an endpoint and return what was removed
    fn remove(&self, id: &str) -> Result<Endpoint, CatalogError>;
}
