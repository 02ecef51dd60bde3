//! Hostname-only check.

use async_trait::async_trait;
use std::sync::Arc;

use super::CheckPerformer;
use crate::domain::{CheckResult, CheckTarget, Domain};
use crate::ports::DomainChecker;

/// Checks a domain against its declared MX hostnames.
pub struct PlainCheck {
    checker: Arc<dyn DomainChecker>,
}

impl PlainCheck {
    /// Wrap a check algorithm.
    pub fn new(checker: Arc<dyn DomainChecker>) -> Self {
        Self { checker }
    }
}

#[async_trait]
impl CheckPerformer for PlainCheck {
    async fn perform(&self, domain: &Domain) -> CheckResult {
        let target = CheckTarget::Hostnames(domain.mxs.clone());
        self.checker.check_domain(&domain.name, &target).await
    }
}
