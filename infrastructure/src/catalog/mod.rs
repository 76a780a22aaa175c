//! Endpoint catalog storage

mod json_catalog;

pub use json_catalog::JsonEndpointCatalog;
