//! # Domain Entities
//!
//! The tracked domain record and the result of checking it.

use serde::{Deserialize, Serialize};

use super::value_objects::{DomainStatus, MtaStsPolicy};

/// A domain whose mail security policy was previously accepted and is
/// periodically re-validated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Domain {
    /// Domain name, the identity used by the store.
    pub name: String,
    /// Expected MX hostnames.
    pub mxs: Vec<String>,
    /// Whether the domain publishes an MTA-STS policy that supersedes
    /// plain hostname checks.
    pub mta_sts: bool,
    /// Expected MTA-STS policy when `mta_sts` is set.
    pub policy: Option<MtaStsPolicy>,
}

impl Domain {
    /// A domain validated against a fixed list of MX hostnames.
    pub fn new(name: impl Into<String>, mxs: Vec<String>) -> Self {
        Self {
            name: name.into(),
            mxs,
            mta_sts: false,
            policy: None,
        }
    }

    /// A domain validated through its MTA-STS policy.
    pub fn with_mta_sts(name: impl Into<String>, policy: MtaStsPolicy) -> Self {
        Self {
            name: name.into(),
            mxs: policy.mxs.clone(),
            mta_sts: true,
            policy: Some(policy),
        }
    }

    /// Whether the observed policy matches what the store expects.
    ///
    /// A missing policy only matches a missing policy.
    pub fn same_policy(&self, observed: Option<&MtaStsPolicy>) -> bool {
        match (self.policy.as_ref(), observed) {
            (Some(expected), Some(observed)) => expected.same_constraints(observed),
            (None, None) => true,
            _ => false,
        }
    }

    /// Copy of this record carrying `observed` as its expected policy.
    pub fn with_observed_policy(&self, observed: Option<&MtaStsPolicy>) -> Domain {
        let mut updated = self.clone();
        if let Some(policy) = observed {
            updated.mxs = policy.mxs.clone();
        }
        updated.policy = observed.cloned();
        updated
    }
}

/// Result of one security check against one domain.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckResult {
    /// Domain that was checked.
    pub domain: String,
    /// Outcome status (0 = conformant).
    pub status: DomainStatus,
    /// MTA-STS policy observed during the check, if one was fetched.
    pub mta_sts: Option<MtaStsPolicy>,
    /// Human readable detail from the check algorithm.
    pub message: Option<String>,
}

impl CheckResult {
    /// A result with the given status and no further detail.
    pub fn new(domain: impl Into<String>, status: DomainStatus) -> Self {
        Self {
            domain: domain.into(),
            status,
            mta_sts: None,
            message: None,
        }
    }

    /// A conformant result.
    pub fn success(domain: impl Into<String>) -> Self {
        Self::new(domain, DomainStatus::Success)
    }

    /// Attach the observed MTA-STS policy.
    pub fn with_policy(mut self, policy: MtaStsPolicy) -> Self {
        self.mta_sts = Some(policy);
        self
    }

    /// Attach a detail message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Whether the check passed.
    pub fn passed(&self) -> bool {
        self.status.is_success()
    }
}

/// Classification of every identity in one batch.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchSummary {
    /// Domains whose check returned status 0.
    pub passed: Vec<String>,
    /// Domains whose check returned a non-zero status.
    pub failed: Vec<String>,
    /// Identities whose record could not be fetched.
    pub skipped: Vec<String>,
}

impl BatchSummary {
    /// Number of domains that produced a check outcome.
    pub fn checked(&self) -> usize {
        self.passed.len() + self.failed.len()
    }
}

/// What one validation cycle did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleReport {
    /// The due set could not be listed; nothing was checked.
    Abandoned {
        /// Store error that caused the abandonment
        reason: String,
    },
    /// The batch was processed.
    Completed(BatchSummary),
}

impl CycleReport {
    /// Summary of a completed cycle.
    pub fn summary(&self) -> Option<&BatchSummary> {
        match self {
            CycleReport::Completed(summary) => Some(summary),
            CycleReport::Abandoned { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PolicyMode;

    fn policy(mxs: &[&str]) -> MtaStsPolicy {
        MtaStsPolicy::new(
            PolicyMode::Enforce,
            mxs.iter().map(|s| s.to_string()).collect(),
            604800,
        )
    }

    #[test]
    fn test_plain_domain_has_no_policy() {
        let domain = Domain::new("example.com", vec!["mx.example.com".to_string()]);
        assert!(!domain.mta_sts);
        assert!(domain.same_policy(None));
        assert!(!domain.same_policy(Some(&policy(&["mx.example.com"]))));
    }

    #[test]
    fn test_mta_sts_domain_copies_mxs() {
        let domain = Domain::with_mta_sts("example.com", policy(&["mx.example.com"]));
        assert!(domain.mta_sts);
        assert_eq!(domain.mxs, vec!["mx.example.com".to_string()]);
        assert!(domain.same_policy(Some(&policy(&["MX.example.com."]))));
        assert!(!domain.same_policy(None));
    }

    #[test]
    fn test_with_observed_policy() {
        let domain = Domain::with_mta_sts("example.com", policy(&["old.example.com"]));
        let observed = policy(&["new.example.com"]);
        let updated = domain.with_observed_policy(Some(&observed));
        assert_eq!(updated.name, "example.com");
        assert_eq!(updated.mxs, vec!["new.example.com".to_string()]);
        assert_eq!(updated.policy, Some(observed));
        assert!(updated.mta_sts);
    }

    #[test]
    fn test_result_builders() {
        let result = CheckResult::new("example.com", DomainStatus::Failure)
            .with_message("certificate expired");
        assert!(!result.passed());
        assert_eq!(result.message.as_deref(), Some("certificate expired"));
        assert!(CheckResult::success("example.com").passed());
    }

    #[test]
    fn test_cycle_report_summary() {
        let summary = BatchSummary {
            passed: vec!["a.example".to_string()],
            failed: vec!["b.example".to_string()],
            skipped: vec!["c.example".to_string()],
        };
        assert_eq!(summary.checked(), 2);
        let report = CycleReport::Completed(summary.clone());
        assert_eq!(report.summary(), Some(&summary));
        let abandoned = CycleReport::Abandoned {
            reason: "store offline".to_string(),
        };
        assert!(abandoned.summary().is_none());
    }
}
