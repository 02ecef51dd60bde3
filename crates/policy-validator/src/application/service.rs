//! # Validator Service
//!
//! The revalidation loop: wait out the interval, fetch the due set, check
//! each domain and report the outcome, forever or until shutdown.
//!
//! Domains are processed one at a time in the order the store returns
//! them. A domain whose record cannot be fetched is skipped; a store that
//! cannot list the due set costs one cycle. Neither stops the loop. There
//! is no per-check timeout, so a hung check stalls its batch.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::Instrument;
use validator_telemetry::{log_domain_event, log_validator_event};

use super::builder::ValidatorBuilder;
use super::reporter::OutcomeReporter;
use super::scheduler::{Scheduler, ShutdownHandle};
use crate::checks::CheckPerformer;
use crate::domain::{AlertError, BatchSummary, CycleReport, ValidatorError};
use crate::ports::{AlertSink, DomainChecker, DomainPolicyStore, ValidatorApi};

/// Periodically re-validates stored domain policies.
pub struct Validator {
    name: String,
    interval: Duration,
    store: Arc<dyn DomainPolicyStore>,
    check: Arc<dyn CheckPerformer>,
    reporter: OutcomeReporter,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("name", &self.name)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl Validator {
    /// Start building a validator.
    pub fn builder(name: impl Into<String>) -> ValidatorBuilder {
        ValidatorBuilder::new(name)
    }

    pub(crate) fn from_parts(
        name: String,
        interval: Duration,
        store: Arc<dyn DomainPolicyStore>,
        check: Arc<dyn CheckPerformer>,
        reporter: OutcomeReporter,
    ) -> Self {
        Self {
            name,
            interval,
            store,
            check,
            reporter,
        }
    }

    /// Scheduler paced by this validator's interval, plus its stop handle.
    pub fn scheduler(&self) -> (Scheduler, ShutdownHandle) {
        Scheduler::new(self.interval)
    }

    /// Run cycles as `scheduler` releases them.
    ///
    /// Returns `Ok(())` after shutdown, or the first alert delivery error.
    pub async fn run(&self, mut scheduler: Scheduler) -> Result<(), ValidatorError> {
        log_validator_event!(
            info,
            self.name,
            "Validator started",
            interval_secs = scheduler.interval().as_secs()
        );

        while scheduler.next_cycle().await {
            if let Err(e) = self.run_cycle().await {
                log_validator_event!(error, self.name, "Validator stopped on alert failure", error = %e);
                return Err(e);
            }
        }

        log_validator_event!(info, self.name, "Validator shut down");
        Ok(())
    }

    async fn validate_batch(&self, due: Vec<String>) -> Result<BatchSummary, AlertError> {
        let mut summary = BatchSummary::default();

        for name in due {
            let domain = match self.store.get_domain(&name).await {
                Ok(domain) => domain,
                Err(e) => {
                    log_domain_event!(warn, self.name, name, "Could not retrieve policy for domain", error = %e);
                    summary.skipped.push(name);
                    continue;
                }
            };

            let mut result = self.check.perform(&domain).await;
            if result.domain != domain.name {
                log_domain_event!(
                    warn,
                    self.name,
                    domain.name,
                    "Check result named a different domain; correcting",
                    reported = %result.domain
                );
                result.domain = domain.name.clone();
            }

            if result.passed() {
                log_domain_event!(debug, self.name, domain.name, "Domain passed");
                self.reporter.policy_passed(&domain, &result).await;
                summary.passed.push(domain.name);
            } else {
                log_domain_event!(warn, self.name, domain.name, "Domain failed; sending report", status = result.status.code());
                self.reporter.policy_failed(&domain, &result).await?;
                summary.failed.push(domain.name);
            }
        }

        Ok(summary)
    }
}

#[async_trait]
impl ValidatorApi for Validator {
    fn name(&self) -> &str {
        &self.name
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn run_cycle(&self) -> Result<CycleReport, ValidatorError> {
        let span = tracing::info_span!("validation_cycle", validator = %self.name);

        async move {
            log_validator_event!(info, self.name, "Starting regular validation");

            let due = match self.store.domains_to_validate().await {
                Ok(due) => due,
                Err(e) => {
                    log_validator_event!(error, self.name, "Could not retrieve domains", error = %e);
                    return Ok(CycleReport::Abandoned {
                        reason: e.to_string(),
                    });
                }
            };

            let summary = self.validate_batch(due).await?;
            log_validator_event!(
                info,
                self.name,
                "Finished regular validation",
                passed = summary.passed.len(),
                failed = summary.failed.len(),
                skipped = summary.skipped.len()
            );
            Ok(CycleReport::Completed(summary))
        }
        .instrument(span)
        .await
    }
}

/// Validate `store` every `interval` with the default hostname check,
/// reporting failures to `alerts`, until `shutdown` turns `true`.
pub async fn validate_regularly(
    name: &str,
    store: Arc<dyn DomainPolicyStore>,
    checker: Arc<dyn DomainChecker>,
    alerts: Arc<dyn AlertSink>,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
) -> Result<(), ValidatorError> {
    let validator = ValidatorBuilder::new(name)
        .store(store)
        .checker(checker)
        .alert_sink(alerts)
        .interval(interval)
        .build()?;
    let scheduler = Scheduler::with_shutdown(validator.interval(), shutdown);
    validator.run(scheduler).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AlertKind, CheckResult, Domain, DomainStatus};
    use crate::ports::{MockPolicyStore, RecordingAlertSink, ScriptedChecker};

    fn domain(name: &str) -> Domain {
        Domain::new(name, vec![format!("mx.{}", name)])
    }

    #[tokio::test]
    async fn test_cycle_classifies_domains() {
        let store = Arc::new(
            MockPolicyStore::new()
                .with_domain(domain("good.example"))
                .with_domain(domain("bad.example")),
        );
        let checker =
            Arc::new(ScriptedChecker::new().with_status("bad.example", DomainStatus::Failure));
        let alerts = Arc::new(RecordingAlertSink::new());
        let validator = Validator::builder("starttls")
            .store(store)
            .checker(checker)
            .alert_sink(alerts.clone())
            .build()
            .unwrap();

        let report = validator.run_cycle().await.unwrap();
        let summary = report.summary().unwrap();

        assert_eq!(summary.passed, vec!["good.example".to_string()]);
        assert_eq!(summary.failed, vec!["bad.example".to_string()]);
        assert_eq!(alerts.count_for(AlertKind::ValidationFailed, "bad.example"), 1);
        assert_eq!(alerts.events().len(), 1);
    }

    #[tokio::test]
    async fn test_listing_failure_abandons_cycle() {
        let store = Arc::new(MockPolicyStore::new().with_domain(domain("a.example")));
        store.set_fail_listing(true);
        let checker = Arc::new(ScriptedChecker::new());
        let validator = Validator::builder("starttls")
            .store(store)
            .checker(checker.clone())
            .alert_sink(Arc::new(RecordingAlertSink::new()))
            .build()
            .unwrap();

        let report = validator.run_cycle().await.unwrap();

        assert!(matches!(report, CycleReport::Abandoned { .. }));
        assert_eq!(checker.call_count(), 0);
    }

    struct Misnamed;

    #[async_trait]
    impl CheckPerformer for Misnamed {
        async fn perform(&self, _domain: &Domain) -> CheckResult {
            CheckResult::new("someone-else.example", DomainStatus::Failure)
        }
    }

    #[tokio::test]
    async fn test_mismatched_result_identity_is_corrected() {
        let store = Arc::new(MockPolicyStore::new().with_domain(domain("a.example")));
        let alerts = Arc::new(RecordingAlertSink::new());
        let validator = Validator::builder("starttls")
            .store(store)
            .check_performer(Arc::new(Misnamed))
            .alert_sink(alerts.clone())
            .build()
            .unwrap();

        validator.run_cycle().await.unwrap();

        assert_eq!(alerts.count_for(AlertKind::ValidationFailed, "a.example"), 1);
        assert_eq!(alerts.count_for(AlertKind::ValidationFailed, "someone-else.example"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_shutdown() {
        let store = Arc::new(MockPolicyStore::new().with_domain(domain("a.example")));
        let validator = Validator::builder("starttls")
            .store(store.clone())
            .checker(Arc::new(ScriptedChecker::new()))
            .alert_sink(Arc::new(RecordingAlertSink::new()))
            .interval(Duration::from_secs(60))
            .build()
            .unwrap();
        let (scheduler, handle) = validator.scheduler();

        let stopper = handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(150)).await;
            stopper.shutdown();
        });

        validator.run(scheduler).await.unwrap();
        assert_eq!(store.list_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_surfaces_alert_failure() {
        let store = Arc::new(MockPolicyStore::new().with_domain(domain("bad.example")));
        let validator = Validator::builder("starttls")
            .store(store)
            .checker(Arc::new(
                ScriptedChecker::new().with_status("bad.example", DomainStatus::Error),
            ))
            .alert_sink(Arc::new(RecordingAlertSink::failing()))
            .interval(Duration::from_secs(60))
            .build()
            .unwrap();
        let (scheduler, _handle) = validator.scheduler();

        let err = validator.run(scheduler).await.unwrap_err();
        assert!(matches!(err, ValidatorError::Alert(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_validate_regularly() {
        let store = Arc::new(MockPolicyStore::new().with_domain(domain("a.example")));
        let checker = Arc::new(ScriptedChecker::new());
        let (tx, rx) = watch::channel(false);

        let task = tokio::spawn(validate_regularly(
            "starttls",
            store.clone(),
            checker.clone(),
            Arc::new(RecordingAlertSink::new()),
            Duration::ZERO,
            rx,
        ));

        tokio::time::sleep(Duration::from_secs(24 * 60 * 60 + 1)).await;
        tx.send_replace(true);
        task.await.unwrap().unwrap();

        assert_eq!(store.list_calls(), 1);
        assert_eq!(checker.call_count(), 1);
    }
}
