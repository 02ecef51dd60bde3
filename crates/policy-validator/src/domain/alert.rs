//! # Alerts
//!
//! Events sent to the external monitoring sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::entities::CheckResult;
use super::errors::AlertError;
use super::value_objects::DomainStatus;

/// Kind of alert raised by a validator.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// A previously accepted domain no longer passes its check.
    ValidationFailed,
    /// Drift was detected but the stored policy could not be corrected.
    PolicyUpdateFailed,
}

impl AlertKind {
    /// Headline used by the monitoring sink.
    pub fn message(self) -> &'static str {
        match self {
            AlertKind::ValidationFailed => "Validation failed for previously validated domain",
            AlertKind::PolicyUpdateFailed => "Could not update stored policy",
        }
    }
}

/// One alert event.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AlertEvent {
    /// Unique event id, for deduplication downstream.
    pub id: Uuid,
    /// What happened.
    pub kind: AlertKind,
    /// Name of the validator that raised the alert.
    pub validator_name: String,
    /// Domain the alert is about.
    pub domain: String,
    /// Check status at the time of the alert.
    pub status: DomainStatus,
    /// Full check result.
    pub result: serde_json::Value,
    /// When the alert was raised.
    pub raised_at: DateTime<Utc>,
}

impl AlertEvent {
    /// Build an alert for `result`, attributed to `validator_name`.
    pub fn new(
        kind: AlertKind,
        validator_name: &str,
        result: &CheckResult,
    ) -> Result<Self, AlertError> {
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            validator_name: validator_name.to_string(),
            domain: result.domain.clone(),
            status: result.status,
            result: serde_json::to_value(result)?,
            raised_at: Utc::now(),
        })
    }

    /// Flat tags for sinks that index key/value pairs.
    pub fn tags(&self) -> BTreeMap<&'static str, String> {
        let mut tags = BTreeMap::new();
        tags.insert("validatorName", self.validator_name.clone());
        tags.insert("domain", self.domain.clone());
        tags.insert("status", self.status.code().to_string());
        tags
    }

    /// Headline for this event.
    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}
