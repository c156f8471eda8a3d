//! Interpretation of successful GENA responses

use crate::request::TIMEOUT_PREFIX;
use gena_client::Headers;
use serde::{Deserialize, Serialize};

/// Subscription metadata reported by the device
///
/// Each field is present only if the device sent the header, and for
/// `timeout` only if its value held a number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionResult {
    /// Subscription identifier, verbatim from the `SID` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    /// Granted lease in seconds, from the `TIMEOUT` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl SubscriptionResult {
    pub fn from_headers(headers: &Headers) -> Self {
        Self {
            sid: headers.get("sid").map(str::to_string),
            timeout: headers.get("timeout").and_then(parse_timeout),
        }
    }
}

/// Parse a `TIMEOUT` header value such as `Second-1800`
///
/// The prefix is skipped by length rather than compared, then leading
/// whitespace is ignored and the leading run of digits is read. Values
/// without digits there (`Second-infinite`) yield `None`.
pub fn parse_timeout(value: &str) -> Option<u64> {
    let rest = value.get(TIMEOUT_PREFIX.len()..)?.trim_start();
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);
    digits.parse().ok()
}
