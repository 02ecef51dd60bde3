//! # Policy Validator
//!
//! Periodic re-validation of previously accepted mail security policies.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Domains whose STARTTLS / MTA-STS configuration was accepted once are
//! re-checked on a fixed interval against the live configuration:
//! - failures are reported to an optional callback and always to the alert sink
//! - MTA-STS drift is written back to the store through an update hook
//! - one unreachable domain or broken record never stops the batch
//!
//! ## Module Structure
//!
//! ```text
//! policy-validator/
//! ├── domain/          # Domain, CheckResult, MtaStsPolicy, alerts, errors
//! ├── ports/           # Store, checker, updater, alert sink, callback traits + mocks
//! ├── checks/          # PlainCheck, MtaStsReconcilingCheck
//! ├── application/     # Validator loop, builder, reporter, scheduler
//! ├── adapters/        # In-memory store, result cache, log alert sink
//! └── config.rs        # ValidatorSettings
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let validator = Validator::builder("mta-sts")
//!     .store(store.clone())
//!     .checker(checker)
//!     .policy_updater(store)
//!     .alert_sink(Arc::new(TracingAlertSink::new()))
//!     .build()?;
//! let (scheduler, shutdown) = validator.scheduler();
//! validator.run(scheduler).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod checks;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{CacheStats, CachedChecker, InMemoryPolicyStore, TracingAlertSink};
pub use application::{
    effective_interval, validate_regularly, FnCallback, OutcomeReporter, Scheduler,
    ShutdownHandle, Validator, ValidatorBuilder, DEFAULT_INTERVAL,
};
pub use checks::{CheckPerformer, MtaStsReconcilingCheck, PlainCheck};
pub use config::{ValidatorSettings, DEFAULT_CACHE_TTL_SECS};
pub use domain::{
    AlertError, AlertEvent, AlertKind, BatchSummary, CallbackError, CheckResult, CheckTarget,
    CycleReport, Domain, DomainStatus, MtaStsPolicy, PolicyMode, StoreError, UpdateError,
    ValidatorError,
};
pub use ports::{
    AlertSink, DomainChecker, DomainPolicyStore, OutcomeCallback, PolicyUpdater, ValidatorApi,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
