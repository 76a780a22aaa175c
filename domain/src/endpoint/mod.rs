//! Endpoint domain.
//!
//! - [`entities::Endpoint`] - a configured callback URL, dialect and phone number
//! - [`entities::NewEndpoint`] / [`entities::EndpointUpdate`] - catalog inputs

pub mod entities;
