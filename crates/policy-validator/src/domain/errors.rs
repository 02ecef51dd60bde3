//! # Domain Errors
//!
//! Error types for the validator and its collaborators.

use thiserror::Error;

/// Failures reported by a policy store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store has no record for this domain.
    #[error("Domain not found: {0}")]
    NotFound(String),

    /// The store could not be reached or answered with an error.
    #[error("Policy store unavailable: {0}")]
    Unavailable(String),
}

/// Failure of the stored-policy update hook.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpdateError {
    /// The store refused the new policy.
    #[error("Policy update rejected for {domain}: {reason}")]
    Rejected {
        /// Domain whose update failed
        domain: String,
        /// Reason given by the store
        reason: String,
    },

    /// The store itself failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure to deliver an alert to the monitoring sink.
#[derive(Debug, Error)]
pub enum AlertError {
    /// The sink did not acknowledge the event.
    #[error("Alert delivery failed: {0}")]
    Delivery(String),

    /// The result payload could not be encoded.
    #[error("Alert payload encoding failed: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Error returned by a user-supplied outcome callback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Outcome callback failed: {0}")]
pub struct CallbackError(pub String);

/// Validator construction and run errors.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// A required collaborator was not configured.
    #[error("Validator is missing required component: {0}")]
    MissingComponent(&'static str),

    /// Invalid settings.
    #[error("Invalid validator configuration: {0}")]
    Config(String),

    /// The alert sink failed while reporting a validation failure.
    #[error(transparent)]
    Alert(#[from] AlertError),
}
