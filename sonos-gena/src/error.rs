use gena_client::{Headers, TransportError, TransportResponse};
use std::fmt;
use thiserror::Error;

/// Errors returned by subscription operations
///
/// Exactly one of these, or a successful result, is produced per call.
/// Nothing here is retried by the controller.
#[derive(Debug, Error)]
pub enum GenaError {
    /// Missing or malformed caller input
    ///
    /// Raised before any network activity, e.g. an empty callback URL,
    /// an empty SID or a non-numeric timeout.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The transport failed before the device produced a response
    ///
    /// Connection refused, DNS failures, timeouts. Passed through unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The device answered with a status other than 200
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl GenaError {
    pub(crate) fn invalid_argument(message: &str) -> Self {
        Self::InvalidArgument(message.to_string())
    }

    /// Status code of a protocol error, if this is one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GenaError::Protocol(error) => Some(error.status_code),
            _ => None,
        }
    }
}

/// Type alias for results that can return a GenaError
pub type Result<T> = std::result::Result<T, GenaError>;

/// Known GENA failure statuses and their human-readable messages
///
/// 400 and 412 are matched exactly. Every status from 500 upwards maps to
/// [`StatusMessage::UnableToAcceptRenewal`]. Anything else has no message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusMessage {
    /// 400
    IncompatibleHeaderFields,
    /// 412
    PreconditionFailed,
    /// 500 and any other 5xx (or higher) status
    UnableToAcceptRenewal,
}

impl StatusMessage {
    pub fn for_status(status_code: u16) -> Option<Self> {
        match status_code {
            400 => Some(StatusMessage::IncompatibleHeaderFields),
            412 => Some(StatusMessage::PreconditionFailed),
            500.. => Some(StatusMessage::UnableToAcceptRenewal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusMessage::IncompatibleHeaderFields => "Incompatible header fields",
            StatusMessage::PreconditionFailed => "Precondition failed",
            StatusMessage::UnableToAcceptRenewal => "Unable to accept renewal",
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-200 answer from the device
///
/// The response headers are echoed as received. The body is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolError {
    pub status_code: u16,
    pub headers: Headers,
    pub message: Option<&'static str>,
}

impl ProtocolError {
    pub fn new(status_code: u16, headers: Headers) -> Self {
        Self {
            status_code,
            headers,
            message: StatusMessage::for_status(status_code).map(|m| m.as_str()),
        }
    }

    /// Split a transport response into success (status 200) or a protocol error
    pub fn check(response: TransportResponse) -> std::result::Result<TransportResponse, ProtocolError> {
        if response.status_code == 200 {
            Ok(response)
        } else {
            Err(ProtocolError::new(response.status_code, response.headers))
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message {
            Some(message) => write!(f, "Protocol error: HTTP {} ({})", self.status_code, message),
            None => write!(f, "Protocol error: HTTP {}", self.status_code),
        }
    }
}

impl std::error::Error for ProtocolError {}
