//! Alert sink that writes alerts to the log stream.
//!
//! Useful where no monitoring service is configured: alerts still surface
//! as `error` level events with every tag as a structured field.

use async_trait::async_trait;
use tracing::error;

use crate::domain::{AlertError, AlertEvent};
use crate::ports::AlertSink;

/// Emits each alert as a `tracing` error event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAlertSink;

impl TracingAlertSink {
    /// Create the sink.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertSink for TracingAlertSink {
    async fn send(&self, event: &AlertEvent) -> Result<(), AlertError> {
        let payload = serde_json::to_string(&event.result)?;
        error!(
            alert_id = %event.id,
            kind = ?event.kind,
            validator = %event.validator_name,
            domain = %event.domain,
            status = event.status.code(),
            raised_at = %event.raised_at,
            result = %payload,
            "{}",
            event.message()
        );
        Ok(())
    }
}
