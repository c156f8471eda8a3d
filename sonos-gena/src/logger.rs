//! Logger capability injected into the subscription controller

/// Receives the informational message written at the start of each attempt
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
}

/// Discards every message. The controller's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn info(&self, _message: &str) {}
}

/// Forwards messages to `tracing` at INFO level under the `sonos_gena` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "sonos_gena", "{}", message);
    }
}
