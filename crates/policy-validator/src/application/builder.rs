//! # Validator Builder
//!
//! Collects a validator's collaborators and resolves every default once,
//! at `build()`. After that the validator's configuration never changes.

use std::sync::Arc;
use std::time::Duration;

use super::reporter::OutcomeReporter;
use super::scheduler::effective_interval;
use super::service::Validator;
use crate::adapters::CachedChecker;
use crate::checks::{CheckPerformer, MtaStsReconcilingCheck, PlainCheck};
use crate::config::ValidatorSettings;
use crate::domain::ValidatorError;
use crate::ports::{AlertSink, DomainChecker, DomainPolicyStore, OutcomeCallback, PolicyUpdater};

/// Builder for [`Validator`].
///
/// Required: a name, a store and an alert sink, plus either an explicit
/// check performer or a check algorithm to build the default one from.
///
/// Without an explicit check performer the builder wraps the check
/// algorithm in a result cache and then in a [`PlainCheck`], or in an
/// [`MtaStsReconcilingCheck`] when a policy updater is supplied.
pub struct ValidatorBuilder {
    name: String,
    interval: Duration,
    cache_ttl: Option<Duration>,
    store: Option<Arc<dyn DomainPolicyStore>>,
    checker: Option<Arc<dyn DomainChecker>>,
    updater: Option<Arc<dyn PolicyUpdater>>,
    check: Option<Arc<dyn CheckPerformer>>,
    alerts: Option<Arc<dyn AlertSink>>,
    on_failure: Option<Arc<dyn OutcomeCallback>>,
    on_success: Option<Arc<dyn OutcomeCallback>>,
}

impl ValidatorBuilder {
    /// Start a builder for a validator called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interval: Duration::ZERO,
            cache_ttl: None,
            store: None,
            checker: None,
            updater: None,
            check: None,
            alerts: None,
            on_failure: None,
            on_success: None,
        }
    }

    /// Start a builder from settings.
    pub fn from_settings(settings: &ValidatorSettings) -> Self {
        Self::new(settings.name.clone())
            .interval(settings.interval())
            .cache_ttl(settings.cache_ttl())
    }

    /// Time between cycles. Zero selects the one-day default.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Lifetime of cached results for the default check performer.
    /// Unset means the cache's one-hour default.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Store to fetch due domains from.
    pub fn store(mut self, store: Arc<dyn DomainPolicyStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Check algorithm used by the default check performer.
    pub fn checker(mut self, checker: Arc<dyn DomainChecker>) -> Self {
        self.checker = Some(checker);
        self
    }

    /// Update hook; selects MTA-STS reconciliation for the default check.
    pub fn policy_updater(mut self, updater: Arc<dyn PolicyUpdater>) -> Self {
        self.updater = Some(updater);
        self
    }

    /// Explicit check performer, overriding the default.
    pub fn check_performer(mut self, check: Arc<dyn CheckPerformer>) -> Self {
        self.check = Some(check);
        self
    }

    /// Alert sink for failure reports.
    pub fn alert_sink(mut self, alerts: Arc<dyn AlertSink>) -> Self {
        self.alerts = Some(alerts);
        self
    }

    /// Callback run before the alert for every failed domain.
    pub fn on_failure(mut self, callback: Arc<dyn OutcomeCallback>) -> Self {
        self.on_failure = Some(callback);
        self
    }

    /// Callback run for every passed domain.
    pub fn on_success(mut self, callback: Arc<dyn OutcomeCallback>) -> Self {
        self.on_success = Some(callback);
        self
    }

    /// Resolve defaults and build the validator.
    pub fn build(self) -> Result<Validator, ValidatorError> {
        if self.name.trim().is_empty() {
            return Err(ValidatorError::Config(
                "validator name must not be empty".to_string(),
            ));
        }
        let store = self
            .store
            .ok_or(ValidatorError::MissingComponent("policy store"))?;
        let alerts = self
            .alerts
            .ok_or(ValidatorError::MissingComponent("alert sink"))?;

        let check: Arc<dyn CheckPerformer> = match (self.check, self.checker) {
            (Some(check), _) => check,
            (None, Some(checker)) => {
                let cached: Arc<dyn DomainChecker> = match self.cache_ttl {
                    Some(ttl) => Arc::new(CachedChecker::new(checker, ttl)),
                    None => Arc::new(CachedChecker::with_default_ttl(checker)),
                };
                match self.updater {
                    Some(updater) => Arc::new(MtaStsReconcilingCheck::new(
                        self.name.clone(),
                        cached,
                        updater,
                        alerts.clone(),
                    )),
                    None => Arc::new(PlainCheck::new(cached)),
                }
            }
            (None, None) => {
                return Err(ValidatorError::MissingComponent(
                    "check performer or domain checker",
                ))
            }
        };

        let reporter = OutcomeReporter::new(self.name.clone(), alerts)
            .with_on_failure(self.on_failure)
            .with_on_success(self.on_success);

        Ok(Validator::from_parts(
            self.name,
            effective_interval(self.interval),
            store,
            check,
            reporter,
        ))
    }
}
