//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] - configuration and session contract errors
//! - [`service_code::ServiceCode`] - a validated USSD short code

pub mod error;
pub mod service_code;
