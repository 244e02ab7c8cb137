//! Shared ledger types
//!
//! Account identifiers and records, ledger-wide aggregates, operation
//! threshold levels and the exact multiply-divide primitive used by every
//! consensus-level amount calculation.

pub mod account;
pub mod aggregates;
pub mod arith;
pub mod threshold;

pub use account::*;
pub use aggregates::*;
pub use arith::*;
pub use threshold::*;
