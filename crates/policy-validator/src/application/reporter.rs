//! # Outcome Reporter
//!
//! Dispatches check outcomes to the optional user callbacks and, for
//! failures, to the external alert sink.
//!
//! Failure reporting is always two steps: the user callback runs first and
//! anything it does wrong is contained, then the alert is sent regardless.
//! A custom failure callback adds to external alerting; it never replaces it.

use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use validator_telemetry::log_domain_event;

use crate::domain::{AlertError, AlertEvent, AlertKind, CallbackError, CheckResult, Domain};
use crate::ports::{AlertSink, OutcomeCallback};

/// Reports the outcome of each domain check.
pub struct OutcomeReporter {
    validator_name: String,
    on_failure: Option<Arc<dyn OutcomeCallback>>,
    on_success: Option<Arc<dyn OutcomeCallback>>,
    alerts: Arc<dyn AlertSink>,
}

impl OutcomeReporter {
    /// Reporter sending failure alerts to `alerts`.
    pub fn new(validator_name: impl Into<String>, alerts: Arc<dyn AlertSink>) -> Self {
        Self {
            validator_name: validator_name.into(),
            on_failure: None,
            on_success: None,
            alerts,
        }
    }

    /// Set the user failure callback.
    pub fn with_on_failure(mut self, callback: Option<Arc<dyn OutcomeCallback>>) -> Self {
        self.on_failure = callback;
        self
    }

    /// Set the user success callback.
    pub fn with_on_success(mut self, callback: Option<Arc<dyn OutcomeCallback>>) -> Self {
        self.on_success = callback;
        self
    }

    /// Report a failed check.
    ///
    /// Only alert delivery errors are returned.
    pub async fn policy_failed(&self, domain: &Domain, result: &CheckResult) -> Result<(), AlertError> {
        if let Some(callback) = &self.on_failure {
            self.invoke_contained(callback.as_ref(), "on_failure", domain, result)
                .await;
        }

        let event = AlertEvent::new(AlertKind::ValidationFailed, &self.validator_name, result)?;
        self.alerts.send(&event).await
    }

    /// Report a passed check.
    pub async fn policy_passed(&self, domain: &Domain, result: &CheckResult) {
        if let Some(callback) = &self.on_success {
            self.invoke_contained(callback.as_ref(), "on_success", domain, result)
                .await;
        }
    }

    async fn invoke_contained(
        &self,
        callback: &dyn OutcomeCallback,
        hook: &'static str,
        domain: &Domain,
        result: &CheckResult,
    ) {
        let call = AssertUnwindSafe(callback.on_outcome(&self.validator_name, domain, result))
            .catch_unwind()
            .await;

        match call {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                log_domain_event!(warn, self.validator_name, domain.name, "Outcome callback failed", hook = hook, error = %e);
            }
            Err(panic) => {
                log_domain_event!(
                    error,
                    self.validator_name,
                    domain.name,
                    "Outcome callback panicked",
                    hook = hook,
                    panic = %panic_message(panic.as_ref())
                );
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Adapts a plain closure to [`OutcomeCallback`].
pub struct FnCallback<F> {
    f: F,
}

impl<F> FnCallback<F>
where
    F: Fn(&str, &Domain, &CheckResult) -> Result<(), CallbackError> + Send + Sync,
{
    /// Wrap `f`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> OutcomeCallback for FnCallback<F>
where
    F: Fn(&str, &Domain, &CheckResult) -> Result<(), CallbackError> + Send + Sync,
{
    async fn on_outcome(
        &self,
        validator_name: &str,
        domain: &Domain,
        result: &CheckResult,
    ) -> Result<(), CallbackError> {
        (self.f)(validator_name, domain, result)
    }
}
