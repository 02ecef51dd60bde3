//! # Domain Value Objects
//!
//! Immutable values describing MTA-STS policies and check outcomes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// MTA-STS policy mode.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    /// Senders must refuse delivery to non-conforming MX hosts.
    Enforce,
    /// Senders report failures but still deliver.
    Testing,
    /// Policy withdrawn.
    None,
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyMode::Enforce => write!(f, "enforce"),
            PolicyMode::Testing => write!(f, "testing"),
            PolicyMode::None => write!(f, "none"),
        }
    }
}

/// A published MTA-STS policy, either expected (stored) or observed (live).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MtaStsPolicy {
    /// Policy mode.
    pub mode: PolicyMode,
    /// Permitted MX patterns (`mx.example.com` or `*.example.com`).
    pub mxs: Vec<String>,
    /// Cache lifetime advertised by the policy, in seconds.
    pub max_age: u64,
}

impl MtaStsPolicy {
    /// Create a policy.
    pub fn new(mode: PolicyMode, mxs: Vec<String>, max_age: u64) -> Self {
        Self { mode, mxs, max_age }
    }

    /// Whether two policies describe the same routing constraints.
    ///
    /// Modes must match and the MX pattern sets must be equal, ignoring
    /// order, ASCII case and a trailing root dot. `max_age` is not compared:
    /// publishers rotate it without changing what senders enforce.
    pub fn same_constraints(&self, other: &MtaStsPolicy) -> bool {
        self.mode == other.mode && normalized_mxs(&self.mxs) == normalized_mxs(&other.mxs)
    }
}

fn normalized_mxs(mxs: &[String]) -> BTreeSet<String> {
    mxs.iter()
        .map(|mx| mx.trim().trim_end_matches('.').to_ascii_lowercase())
        .filter(|mx| !mx.is_empty())
        .collect()
}

/// Outcome code of a security check. Code 0 is the only conformant value.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "u8", try_from = "u8")]
pub enum DomainStatus {
    /// All checks passed.
    Success,
    /// Passed with non-fatal findings.
    Warning,
    /// One or more checks failed.
    Failure,
    /// The check itself errored.
    Error,
    /// A mail server does not offer STARTTLS.
    NoStarttls,
    /// No mail server could be reached.
    CouldNotConnect,
    /// A presented certificate does not match the hostname.
    BadHostname,
}

impl DomainStatus {
    /// Numeric status code.
    pub fn code(self) -> u8 {
        match self {
            DomainStatus::Success => 0,
            DomainStatus::Warning => 1,
            DomainStatus::Failure => 2,
            DomainStatus::Error => 3,
            DomainStatus::NoStarttls => 4,
            DomainStatus::CouldNotConnect => 5,
            DomainStatus::BadHostname => 6,
        }
    }

    /// Whether this status counts as conformant.
    pub fn is_success(self) -> bool {
        self.code() == 0
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<DomainStatus> for u8 {
    fn from(status: DomainStatus) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for DomainStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, String> {
        Ok(match code {
            0 => DomainStatus::Success,
            1 => DomainStatus::Warning,
            2 => DomainStatus::Failure,
            3 => DomainStatus::Error,
            4 => DomainStatus::NoStarttls,
            5 => DomainStatus::CouldNotConnect,
            6 => DomainStatus::BadHostname,
            other => return Err(format!("unknown domain status code {}", other)),
        })
    }
}

/// What the check algorithm should inspect for a domain.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CheckTarget {
    /// Discover and validate the domain's published MTA-STS policy.
    MtaSts,
    /// Validate exactly these MX hostnames.
    Hostnames(Vec<String>),
}
