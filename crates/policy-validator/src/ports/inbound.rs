//! # Inbound Ports
//!
//! What a running validator exposes to its host process.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::{CycleReport, ValidatorError};

/// Validator API - inbound port.
#[async_trait]
pub trait ValidatorApi: Send + Sync {
    /// Name used in logs and alerts.
    fn name(&self) -> &str;

    /// Effective wait between cycles.
    fn interval(&self) -> Duration;

    /// Validate the current due set once.
    ///
    /// Only an alert delivery failure is returned as an error; store and
    /// per-domain failures are folded into the report.
    async fn run_cycle(&self) -> Result<CycleReport, ValidatorError>;
}
