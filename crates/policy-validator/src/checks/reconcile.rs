//! MTA-STS aware check with stored-policy reconciliation.
//!
//! For domains that publish MTA-STS the live policy is authoritative. When
//! the observed policy no longer matches what the store expects, the store
//! is corrected through the update hook. A failed correction raises its own
//! alert; it never changes the check result that is handed back.

use async_trait::async_trait;
use std::sync::Arc;
use validator_telemetry::log_domain_event;

use super::{CheckPerformer, PlainCheck};
use crate::domain::{AlertEvent, AlertKind, CheckResult, CheckTarget, Domain, UpdateError};
use crate::ports::{AlertSink, DomainChecker, PolicyUpdater};

/// Check performer that reconciles stored MTA-STS policies with live ones.
pub struct MtaStsReconcilingCheck {
    validator_name: String,
    checker: Arc<dyn DomainChecker>,
    updater: Arc<dyn PolicyUpdater>,
    alerts: Arc<dyn AlertSink>,
    fallback: PlainCheck,
}

impl MtaStsReconcilingCheck {
    /// Create the check. `validator_name` attributes update-failure alerts.
    pub fn new(
        validator_name: impl Into<String>,
        checker: Arc<dyn DomainChecker>,
        updater: Arc<dyn PolicyUpdater>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            validator_name: validator_name.into(),
            fallback: PlainCheck::new(checker.clone()),
            checker,
            updater,
            alerts,
        }
    }

    async fn reconcile(&self, domain: &Domain, result: &CheckResult) {
        // No observed policy means the fetch failed; the failed status is
        // reported by the outcome path, not treated as a withdrawal.
        let Some(observed) = result.mta_sts.as_ref() else {
            return;
        };
        if domain.same_policy(Some(observed)) {
            return;
        }

        log_domain_event!(
            info,
            self.validator_name,
            domain.name,
            "Stored MTA-STS policy drifted; updating",
            mode = %observed.mode
        );

        let updated = domain.with_observed_policy(Some(observed));
        if let Err(e) = self.updater.update_policy(&updated).await {
            self.report_update_failure(domain, result, &e).await;
        }
    }

    async fn report_update_failure(&self, domain: &Domain, result: &CheckResult, err: &UpdateError) {
        log_domain_event!(
            error,
            self.validator_name,
            domain.name,
            "Could not update stored policy",
            error = %err
        );

        let delivered = match AlertEvent::new(AlertKind::PolicyUpdateFailed, &self.validator_name, result) {
            Ok(event) => self.alerts.send(&event).await,
            Err(e) => Err(e),
        };
        if let Err(e) = delivered {
            log_domain_event!(
                error,
                self.validator_name,
                domain.name,
                "Policy update alert was not delivered",
                error = %e
            );
        }
    }
}

#[async_trait]
impl CheckPerformer for MtaStsReconcilingCheck {
    async fn perform(&self, domain: &Domain) -> CheckResult {
        if !domain.mta_sts {
            return self.fallback.perform(domain).await;
        }

        let result = self
            .checker
            .check_domain(&domain.name, &CheckTarget::MtaSts)
            .await;
        self.reconcile(domain, &result).await;
        result
    }
}
