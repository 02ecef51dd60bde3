//! # Domain Module
//!
//! Core types: the tracked domain record, check results, MTA-STS policies,
//! alert events and the error taxonomy.

pub mod alert;
pub mod entities;
pub mod errors;
pub mod value_objects;

pub use alert::*;
pub use entities::*;
pub use errors::*;
pub use value_objects::*;
