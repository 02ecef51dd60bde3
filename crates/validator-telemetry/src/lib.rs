//! # Validator Telemetry
//!
//! Structured logging for the policy validator.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use validator_telemetry::{init_telemetry, TelemetryConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_telemetry(&config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `VALIDATOR_SERVICE_NAME` | `policy-validator` | Service name in logs |
//! | `VALIDATOR_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `VALIDATOR_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `VALIDATOR_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |

#![warn(missing_docs)]

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{init_test_tracing, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),

    /// The configuration (e.g. filter directive) is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize validator logging.
///
/// Call once at process start, before the first validator is spawned.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_setup::init_tracing(config)
}
