//! # Outbound Ports
//!
//! Traits for the validator's collaborators: the policy store, the check
//! algorithm, the stored-policy update hook, the alert sink and user
//! outcome callbacks.

use async_trait::async_trait;

use crate::domain::{
    AlertError, AlertEvent, CallbackError, CheckResult, CheckTarget, Domain, StoreError,
    UpdateError,
};

/// Back-end holding domains and their expected policies.
#[async_trait]
pub trait DomainPolicyStore: Send + Sync {
    /// Identities currently due for re-validation.
    ///
    /// Which domains are due is the store's decision.
    async fn domains_to_validate(&self) -> Result<Vec<String>, StoreError>;

    /// Full record for one domain.
    async fn get_domain(&self, name: &str) -> Result<Domain, StoreError>;
}

/// The security check algorithm.
///
/// Never fails: an incomplete check is reported through a non-zero status.
#[async_trait]
pub trait DomainChecker: Send + Sync {
    /// Check `domain` against `target`.
    async fn check_domain(&self, domain: &str, target: &CheckTarget) -> CheckResult;
}

/// Writes a corrected expected policy back to the store.
///
/// Must be safe to call more than once with the same record.
#[async_trait]
pub trait PolicyUpdater: Send + Sync {
    /// Replace the stored record for `domain.name` with `domain`.
    async fn update_policy(&self, domain: &Domain) -> Result<(), UpdateError>;
}

/// External monitoring sink.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver `event`, returning once the sink acknowledged it.
    async fn send(&self, event: &AlertEvent) -> Result<(), AlertError>;
}

/// User hook invoked with each check outcome.
#[async_trait]
pub trait OutcomeCallback: Send + Sync {
    /// Called with the validator name, the checked domain and its result.
    async fn on_outcome(
        &self,
        validator_name: &str,
        domain: &Domain,
        result: &CheckResult,
    ) -> Result<(), CallbackError>;
}
