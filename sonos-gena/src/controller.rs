//! GENA subscription controller for one media renderer
//!
//! The controller builds SUBSCRIBE requests, hands them to its transport and
//! turns the device's answer into either a [`SubscriptionResult`] or a
//! [`GenaError`]. It keeps no state between calls, so a single instance can
//! be shared across threads and used concurrently.

use crate::error::{GenaError, ProtocolError, Result};
use crate::logger::{Logger, NoopLogger};
use crate::request::{SubscriptionRequest, DEFAULT_TIMEOUT, DEVICE_PORT, EVENT_PATH, SUBSCRIBE_METHOD};
use crate::response::SubscriptionResult;
use gena_client::{Headers, HttpTransport, Transport, TransportRequest, TransportResponse};
use std::fmt;
use std::sync::Arc;

/// Subscribes to and renews AVTransport events on a single device
///
/// # Example
/// ```rust,no_run
/// use sonos_gena::{SubscriptionController, TracingLogger};
/// use std::sync::Arc;
///
/// let controller = SubscriptionController::new("192.168.1.100")
///     .with_logger(Arc::new(TracingLogger));
///
/// let subscription = controller.subscribe("http://192.168.1.50:8080/notify")?;
/// if let Some(sid) = subscription.sid {
///     controller.renew(&sid, None)?;
/// }
/// # Ok::<(), sonos_gena::GenaError>(())
/// ```
#[derive(Clone)]
pub struct SubscriptionController {
    address: String,
    port: u16,
    logger: Arc<dyn Logger>,
    transport: Arc<dyn Transport>,
}

impl SubscriptionController {
    /// Create a controller using [`HttpTransport`] and a disabled logger
    pub fn new(address: impl Into<String>) -> Self {
        Self::with_parts(address, None, None)
    }

    /// Create a controller from optional collaborators, defaulting the ones left out
    pub fn with_parts(
        address: impl Into<String>,
        logger: Option<Arc<dyn Logger>>,
        transport: Option<Arc<dyn Transport>>,
    ) -> Self {
        Self {
            address: address.into(),
            port: DEVICE_PORT,
            logger: logger.unwrap_or_else(|| Arc::new(NoopLogger)),
            transport: transport.unwrap_or_else(|| Arc::new(HttpTransport::new())),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Override the device port (1400 unless changed)
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Address of the device this controller talks to
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Subscribe to AVTransport events, asking the device to notify `callback_url`
    ///
    /// # Errors
    /// - `GenaError::InvalidArgument` if `callback_url` is empty (no request is sent)
    /// - `GenaError::Transport` if the device could not be reached
    /// - `GenaError::Protocol` if the device answered with anything but 200
    pub fn subscribe(&self, callback_url: &str) -> Result<SubscriptionResult> {
        if callback_url.is_empty() {
            return Err(GenaError::invalid_argument("Must specify a callback URL."));
        }

        self.logger.info(&format!(
            "Subscribing to speaker {} with callback URL {}",
            self.address, callback_url
        ));

        self.subscribe_internal(&SubscriptionRequest::subscribe(callback_url))
    }

    /// Renew the subscription `sid`
    ///
    /// `None` (or `Some(0)`) requests [`DEFAULT_TIMEOUT`]; any other value is
    /// sent as the requested lease.
    ///
    /// # Errors
    /// - `GenaError::InvalidArgument` if `sid` is empty (no request is sent)
    /// - `GenaError::Transport` / `GenaError::Protocol` as for [`subscribe`](Self::subscribe)
    pub fn renew(&self, sid: &str, timeout: Option<u64>) -> Result<SubscriptionResult> {
        if sid.is_empty() {
            return Err(GenaError::invalid_argument("Must specify a SID."));
        }
        self.renew_validated(sid, timeout)
    }

    /// Renew with a timeout given as text, e.g. read from configuration
    ///
    /// # Errors
    /// `GenaError::InvalidArgument` with "Timeout must be a number." when
    /// `timeout` is not an unsigned integer, otherwise as [`renew`](Self::renew).
    pub fn renew_with_timeout_arg(&self, sid: &str, timeout: &str) -> Result<SubscriptionResult> {
        if sid.is_empty() {
            return Err(GenaError::invalid_argument("Must specify a SID."));
        }
        let timeout = timeout
            .trim()
            .parse::<u64>()
            .map_err(|_| GenaError::invalid_argument("Timeout must be a number."))?;
        self.renew_validated(sid, Some(timeout))
    }

    /// Cancelling subscriptions is not supported; this does nothing.
    pub fn unsubscribe(&self) -> Result<()> {
        Ok(())
    }

    /// Playback control is not supported; this does nothing.
    pub fn play(&self) -> Result<()> {
        Ok(())
    }

    /// Playback control is not supported; this does nothing.
    pub fn pause(&self) -> Result<()> {
        Ok(())
    }

    /// Playback control is not supported; this does nothing.
    pub fn next(&self) -> Result<()> {
        Ok(())
    }

    fn renew_validated(&self, sid: &str, timeout: Option<u64>) -> Result<SubscriptionResult> {
        let timeout = timeout.filter(|&t| t > 0).unwrap_or(DEFAULT_TIMEOUT);

        self.logger.info(&format!(
            "Renewing speaker {} with SID {} and timeout {}",
            self.address, sid, timeout
        ));

        self.subscribe_internal(&SubscriptionRequest::renew(sid, timeout))
    }

    fn subscribe_internal(&self, request: &SubscriptionRequest) -> Result<SubscriptionResult> {
        let response = self.make_request(SUBSCRIBE_METHOD, EVENT_PATH, request.headers())?;
        let result = SubscriptionResult::from_headers(&response.headers);

        tracing::debug!(
            target: "sonos_gena",
            address = %self.address,
            sid = ?result.sid,
            timeout = ?result.timeout,
            "subscription accepted"
        );
        Ok(result)
    }

    fn make_request(&self, method: &str, path: &str, headers: Headers) -> Result<TransportResponse> {
        let request = TransportRequest {
            method: method.to_string(),
            hostname: self.address.clone(),
            port: self.port,
            path: path.to_string(),
            headers,
        };

        tracing::debug!(
            target: "sonos_gena",
            url = %request.url(),
            method = %request.method,
            "sending GENA request"
        );

        let response = self.transport.send(&request)?;
        ProtocolError::check(response).map_err(|error| {
            tracing::debug!(
                target: "sonos_gena",
                address = %self.address,
                status = error.status_code,
                "device rejected GENA request"
            );
            GenaError::Protocol(error)
        })
    }
}

impl fmt::Debug for SubscriptionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionController")
            .field("address", &self.address)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}
