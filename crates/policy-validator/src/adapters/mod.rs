//! # Adapters Layer (Hexagonal Architecture)
//!
//! Concrete implementations of the outbound ports.

pub mod alert_log;
pub mod cached_checker;
pub mod memory_store;

pub use alert_log::TracingAlertSink;
pub use cached_checker::{CacheStats, CachedChecker};
pub use memory_store::InMemoryPolicyStore;
