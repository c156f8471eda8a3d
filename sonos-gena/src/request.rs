//! GENA request construction

use gena_client::Headers;

/// HTTP method used for both new subscriptions and renewals
pub const SUBSCRIBE_METHOD: &str = "SUBSCRIBE";

/// Event endpoint of the AVTransport service on a media renderer
pub const EVENT_PATH: &str = "/MediaRenderer/AVTransport/Event";

/// Port Sonos speakers serve UPnP on
pub const DEVICE_PORT: u16 = 1400;

/// Prefix of `TIMEOUT` header values, as in `Second-1800`
pub const TIMEOUT_PREFIX: &str = "Second-";

/// Timeout sent on renewal when the caller does not supply one (12 hours in milliseconds)
pub const DEFAULT_TIMEOUT: u64 = 43_200_000;

/// Header set for one of the two GENA subscription requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionRequest {
    /// Initial subscription: `CALLBACK` and `NT` headers
    Subscribe { callback_url: String },
    /// Renewal of an existing subscription: `SID` and `TIMEOUT` headers
    Renew { sid: String, timeout: u64 },
}

impl SubscriptionRequest {
    pub fn subscribe(callback_url: impl Into<String>) -> Self {
        Self::Subscribe {
            callback_url: callback_url.into(),
        }
    }

    pub fn renew(sid: impl Into<String>, timeout: u64) -> Self {
        Self::Renew {
            sid: sid.into(),
            timeout,
        }
    }

    pub fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        match self {
            SubscriptionRequest::Subscribe { callback_url } => {
                headers.insert("CALLBACK", format!("<{}>", callback_url));
                headers.insert("NT", "upnp:event");
            }
            SubscriptionRequest::Renew { sid, timeout } => {
                headers.insert("SID", sid.as_str());
                headers.insert("TIMEOUT", format!("{}{}", TIMEOUT_PREFIX, timeout));
            }
        }
        headers
    }
}
