//! # Ports Module
//!
//! Hexagonal architecture ports (inbound API, outbound dependencies) and
//! in-memory doubles for them.

pub mod inbound;
pub mod mocks;
pub mod outbound;

pub use inbound::*;
pub use mocks::*;
pub use outbound::*;
