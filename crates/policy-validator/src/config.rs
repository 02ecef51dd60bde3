//! # Validator Configuration
//!
//! Settings for one validator instance, loadable from the environment.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::application::scheduler::effective_interval;

/// Default lifetime of cached check results (one hour).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60;

/// Validator settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ValidatorSettings {
    /// Name used in logs and alerts.
    pub name: String,

    /// Seconds between validation cycles. Zero selects the one-day default.
    pub interval_secs: u64,

    /// Seconds a check result may be reused by the result cache.
    pub cache_ttl_secs: u64,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            name: "policy".to_string(),
            interval_secs: 0,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl ValidatorSettings {
    /// Read settings from the environment.
    ///
    /// - `VALIDATOR_NAME` (default: policy)
    /// - `VALIDATOR_INTERVAL_SECS` (default: one day)
    /// - `VALIDATOR_CACHE_TTL_SECS` (default: 3600)
    ///
    /// Unparsable numbers fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            name: env::var("VALIDATOR_NAME").unwrap_or(defaults.name),
            interval_secs: env::var("VALIDATOR_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.interval_secs),
            cache_ttl_secs: env::var("VALIDATOR_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.cache_ttl_secs),
        }
    }

    /// Short intervals for tests.
    pub fn for_testing() -> Self {
        Self {
            name: "test".to_string(),
            interval_secs: 1,
            cache_ttl_secs: 0,
        }
    }

    /// Interval the validator will actually use.
    pub fn interval(&self) -> Duration {
        effective_interval(Duration::from_secs(self.interval_secs))
    }

    /// Result cache lifetime.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
