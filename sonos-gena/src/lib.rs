//! UPnP GENA subscription controller for Sonos media renderers
//!
//! This crate handles the client side of GENA eventing for a speaker's
//! AVTransport service: it sends `SUBSCRIBE` requests (new subscriptions and
//! renewals), interprets the device's answer, and maps failure statuses to a
//! small error taxonomy. The HTTP exchange itself goes through the
//! [`Transport`] capability from the `sonos-gena-client` crate, so tests and
//! embedders can substitute their own.
//!
//! ```rust,no_run
//! use sonos_gena::SubscriptionController;
//!
//! let controller = SubscriptionController::new("192.168.1.100");
//! let subscription = controller.subscribe("http://192.168.1.50:8080/notify")?;
//! println!("sid={:?} timeout={:?}", subscription.sid, subscription.timeout);
//! # Ok::<(), sonos_gena::GenaError>(())
//! ```
//!
//! Retrying failed requests is left to the caller.

pub mod controller;
pub mod error;
pub mod logger;
pub mod logging;
pub mod request;
pub mod response;

pub use controller::SubscriptionController;
pub use error::{GenaError, ProtocolError, Result, StatusMessage};
pub use gena_client::{Headers, HttpTransport, Transport, TransportError, TransportRequest, TransportResponse};
pub use logger::{Logger, NoopLogger, TracingLogger};
pub use request::{SubscriptionRequest, DEFAULT_TIMEOUT, DEVICE_PORT, EVENT_PATH};
pub use response::SubscriptionResult;
