//! Blocking HTTP transport for UPnP GENA subscriptions
//!
//! This crate provides the request-transport capability used by the
//! subscription controller in `sonos-gena`. GENA requests are HTTP-like
//! (`SUBSCRIBE`, `UNSUBSCRIBE`) and carry all of their meaning in headers, so
//! the transport only exchanges a method, a target, and header maps. Response
//! bodies are never read.
//!
//! The [`Transport`] trait is the seam: [`HttpTransport`] talks to real
//! devices, while tests substitute closures or fakes.

mod error;

pub use error::TransportError;

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::time::Duration;

/// HTTP header map keyed by header name
///
/// Names are stored as given. Lookups through [`Headers::get`] fall back to a
/// case-insensitive match, since devices are free to choose header casing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: BTreeMap<String, String>,
}

impl Headers {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, returning the previous value stored under the exact same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), value.into())
    }

    /// Look up a header value by name, ignoring ASCII case
    pub fn get(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.entries.get(name) {
            return Some(value.as_str());
        }
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Whether a header with this name (ignoring ASCII case) is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A single outbound GENA request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// HTTP method, e.g. `SUBSCRIBE`
    pub method: String,
    /// Device host name or IP address
    pub hostname: String,
    /// Device port (1400 for Sonos speakers)
    pub port: u16,
    /// Absolute request path, e.g. `/MediaRenderer/AVTransport/Event`
    pub path: String,
    /// Request headers
    pub headers: Headers,
}

impl TransportRequest {
    /// Full `http://` URL of this request
    pub fn url(&self) -> String {
        format!("http://{}:{}{}", self.hostname, self.port, self.path)
    }

    /// Value for the `HOST` header
    pub fn host(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

/// What came back from the device: a status code and headers, body ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status_code: u16,
    pub headers: Headers,
}

impl TransportResponse {
    pub fn new(status_code: u16, headers: Headers) -> Self {
        Self {
            status_code,
            headers,
        }
    }
}

/// Capability to deliver a GENA request to a device
///
/// Implementations must return every HTTP response they receive, whatever
/// its status; classification of status codes belongs to the caller. An
/// `Err` means no response was obtained at all.
pub trait Transport: Send + Sync {
    fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&TransportRequest) -> Result<TransportResponse, TransportError> + Send + Sync,
{
    fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        self(request)
    }
}

/// Default transport sending real HTTP requests with `ureq`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    /// Create a transport with the default connect (5s) and read (10s) timeouts
    pub fn new() -> Self {
        Self::with_timeouts(Duration::from_secs(5), Duration::from_secs(10))
    }

    /// Create a transport with custom timeouts
    ///
    /// Redirects are never followed; a 3xx comes back as the device's response.
    pub fn with_timeouts(connect: Duration, read: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(connect)
                .timeout_read(read)
                .redirects(0)
                .build(),
        }
    }

    fn collect_headers(response: &ureq::Response) -> Headers {
        response
            .headers_names()
            .into_iter()
            .filter_map(|name| {
                let value = response.header(&name)?.to_string();
                Some((name.to_ascii_lowercase(), value))
            })
            .collect()
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        if request.method.is_empty() {
            return Err(TransportError::InvalidRequest("missing HTTP method".to_string()));
        }
        if !request.path.starts_with('/') {
            return Err(TransportError::InvalidRequest(format!(
                "request path must be absolute: {}",
                request.path
            )));
        }

        let url = request.url();
        tracing::trace!(method = %request.method, %url, "sending GENA request");

        let mut http_request = self
            .agent
            .request(&request.method, &url)
            .set("HOST", &request.host());
        for (name, value) in &request.headers {
            http_request = http_request.set(name, value);
        }

        // ureq reports 4xx/5xx as errors, but they still carry a device response
        let response = match http_request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(e)) => return Err(TransportError::Network(e.to_string())),
        };

        Ok(TransportResponse::new(
            response.status(),
            Self::collect_headers(&response),
        ))
    }
}
