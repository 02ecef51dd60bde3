//! In-memory doubles for every outbound port.
//!
//! They record each call so tests can assert on exactly what the validator
//! did, and can be told to fail on demand.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::outbound::{AlertSink, DomainChecker, DomainPolicyStore, OutcomeCallback, PolicyUpdater};
use crate::domain::{
    AlertError, AlertEvent, AlertKind, CallbackError, CheckResult, CheckTarget, Domain,
    DomainStatus, StoreError, UpdateError,
};

/// Mock policy store.
///
/// Identities listed as due but never inserted yield `StoreError::NotFound`.
#[derive(Default)]
pub struct MockPolicyStore {
    domains: Mutex<HashMap<String, Domain>>,
    due: Mutex<Vec<String>>,
    unavailable: Mutex<HashSet<String>>,
    fail_listing: AtomicBool,
    list_calls: AtomicUsize,
}

impl MockPolicyStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a domain and mark it due.
    pub fn with_domain(self, domain: Domain) -> Self {
        self.mark_due(&domain.name);
        self.domains.lock().insert(domain.name.clone(), domain);
        self
    }

    /// Mark an identity due without storing a record for it.
    pub fn with_missing(self, name: &str) -> Self {
        self.mark_due(name);
        self
    }

    /// Add an identity to the due list.
    pub fn mark_due(&self, name: &str) {
        self.due.lock().push(name.to_string());
    }

    /// Make `get_domain(name)` fail with `StoreError::Unavailable`.
    pub fn fail_get(&self, name: &str) {
        self.unavailable.lock().insert(name.to_string());
    }

    /// Make `domains_to_validate` fail.
    pub fn set_fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    /// How many times the due set was requested.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Current stored record.
    pub fn stored(&self, name: &str) -> Option<Domain> {
        self.domains.lock().get(name).cloned()
    }
}

#[async_trait]
impl DomainPolicyStore for MockPolicyStore {
    async fn domains_to_validate(&self) -> Result<Vec<String>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("Mock failure".to_string()));
        }
        Ok(self.due.lock().clone())
    }

    async fn get_domain(&self, name: &str) -> Result<Domain, StoreError> {
        if self.unavailable.lock().contains(name) {
            return Err(StoreError::Unavailable("Mock failure".to_string()));
        }
        self.domains
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}

/// Check algorithm returning preset results.
///
/// Domains without a preset result pass.
#[derive(Default)]
pub struct ScriptedChecker {
    results: Mutex<HashMap<String, CheckResult>>,
    calls: Mutex<Vec<(String, CheckTarget)>>,
}

impl ScriptedChecker {
    /// Checker where every domain passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset the result for `result.domain`.
    pub fn with_result(self, result: CheckResult) -> Self {
        self.set_result(result);
        self
    }

    /// Preset a bare status for `domain`.
    pub fn with_status(self, domain: &str, status: DomainStatus) -> Self {
        self.with_result(CheckResult::new(domain, status))
    }

    /// Replace the preset result for `result.domain`.
    pub fn set_result(&self, result: CheckResult) {
        self.results.lock().insert(result.domain.clone(), result);
    }

    /// Every `(domain, target)` this checker was asked about.
    pub fn calls(&self) -> Vec<(String, CheckTarget)> {
        self.calls.lock().clone()
    }

    /// Number of checks performed.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl DomainChecker for ScriptedChecker {
    async fn check_domain(&self, domain: &str, target: &CheckTarget) -> CheckResult {
        self.calls.lock().push((domain.to_string(), target.clone()));
        self.results
            .lock()
            .get(domain)
            .cloned()
            .unwrap_or_else(|| CheckResult::success(domain))
    }
}

/// Update hook that records every write.
#[derive(Default)]
pub struct RecordingUpdater {
    updates: Mutex<Vec<Domain>>,
    fail: AtomicBool,
}

impl RecordingUpdater {
    /// Hook that accepts every update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hook that rejects every update.
    pub fn failing() -> Self {
        let updater = Self::default();
        updater.fail.store(true, Ordering::SeqCst);
        updater
    }

    /// Records passed to the hook, in call order.
    pub fn updates(&self) -> Vec<Domain> {
        self.updates.lock().clone()
    }
}

#[async_trait]
impl PolicyUpdater for RecordingUpdater {
    async fn update_policy(&self, domain: &Domain) -> Result<(), UpdateError> {
        self.updates.lock().push(domain.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(UpdateError::Rejected {
                domain: domain.name.clone(),
                reason: "Mock failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Alert sink that keeps every event in memory.
#[derive(Default)]
pub struct RecordingAlertSink {
    events: Mutex<Vec<AlertEvent>>,
    fail: AtomicBool,
}

impl RecordingAlertSink {
    /// Sink that acknowledges every event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that records and then rejects every event.
    pub fn failing() -> Self {
        let sink = Self::default();
        sink.fail.store(true, Ordering::SeqCst);
        sink
    }

    /// All events, in delivery order.
    pub fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().clone()
    }

    /// Events of one kind about one domain.
    pub fn count_for(&self, kind: AlertKind, domain: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind == kind && e.domain == domain)
            .count()
    }
}

#[async_trait]
impl AlertSink for RecordingAlertSink {
    async fn send(&self, event: &AlertEvent) -> Result<(), AlertError> {
        self.events.lock().push(event.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(AlertError::Delivery("Mock failure".to_string()));
        }
        Ok(())
    }
}

/// How a [`RecordingCallback`] behaves after recording a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackBehaviour {
    /// Return `Ok(())`.
    Succeed,
    /// Return a `CallbackError`.
    Fail,
    /// Panic.
    Panic,
}

/// Outcome callback that records `(validator, domain, status)` per call.
pub struct RecordingCallback {
    calls: Mutex<Vec<(String, String, DomainStatus)>>,
    behaviour: CallbackBehaviour,
}

impl RecordingCallback {
    /// Callback with the given behaviour.
    pub fn new(behaviour: CallbackBehaviour) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            behaviour,
        }
    }

    /// Recorded calls.
    pub fn calls(&self) -> Vec<(String, String, DomainStatus)> {
        self.calls.lock().clone()
    }

    /// Domains this callback was called for.
    pub fn domains(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(_, d, _)| d.clone()).collect()
    }
}

#[async_trait]
impl OutcomeCallback for RecordingCallback {
    async fn on_outcome(
        &self,
        validator_name: &str,
        domain: &Domain,
        result: &CheckResult,
    ) -> Result<(), CallbackError> {
        self.calls.lock().push((
            validator_name.to_string(),
            domain.name.clone(),
            result.status,
        ));
        match self.behaviour {
            CallbackBehaviour::Succeed => Ok(()),
            CallbackBehaviour::Fail => Err(CallbackError("Mock failure".to_string())),
            CallbackBehaviour::Panic => panic!("callback panicked for {}", domain.name),
        }
    }
}
