//! Error types for the GENA transport

use thiserror::Error;

/// Errors raised before a device produced any HTTP response
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network or HTTP communication error (connection refused, DNS, timeouts)
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The request could not be turned into a valid HTTP request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
