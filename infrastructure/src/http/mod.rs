//! HTTP adapter for gateway callbacks

mod transport;

pub use transport::HttpUssdTransport;
