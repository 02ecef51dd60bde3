//! # Check Performers
//!
//! A check performer turns a stored domain record into a fresh check
//! result. It never fails: anything that prevents a check from completing
//! is expressed as a non-zero status so one bad domain cannot halt a batch.

pub mod plain;
pub mod reconcile;

pub use plain::PlainCheck;
pub use reconcile::MtaStsReconcilingCheck;

use async_trait::async_trait;

use crate::domain::{CheckResult, Domain};

/// Performs the security check for one domain.
#[async_trait]
pub trait CheckPerformer: Send + Sync {
    /// Check `domain` and return the result for it.
    async fn perform(&self, domain: &Domain) -> CheckResult;
}
