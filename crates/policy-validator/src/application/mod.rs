//! # Application Module
//!
//! The validator loop and the pieces it is assembled from.

pub mod builder;
pub mod reporter;
pub mod scheduler;
pub mod service;

pub use builder::ValidatorBuilder;
pub use reporter::{FnCallback, OutcomeReporter};
pub use scheduler::{effective_interval, Scheduler, ShutdownHandle, DEFAULT_INTERVAL};
pub use service::{validate_regularly, Validator};
