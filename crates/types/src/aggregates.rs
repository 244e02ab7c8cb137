//! Ledger-wide aggregates carried in every ledger header

use serde::{Deserialize, Serialize};

/// Global ledger aggregates mutated by header-level state transitions.
///
/// `total_coins` and `fee_pool` are unsigned and must only ever change through
/// checked arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerAggregates {
    /// Total coins in existence (stroop-like smallest units)
    pub total_coins: u64,
    /// Fees collected and not yet redistributed
    pub fee_pool: u64,
    /// Number of inflation runs applied so far
    pub inflation_seq: u64,
    /// Consensus close time of the ledger being applied (unix seconds)
    pub close_time: u64,
    /// Protocol version of the ledger being applied
    pub ledger_version: u32,
}

impl LedgerAggregates {
    pub fn new(total_coins: u64, fee_pool: u64, close_time: u64, ledger_version: u32) -> Self {
        Self {
            total_coins,
            fee_pool,
            inflation_seq: 0,
            close_time,
            ledger_version,
        }
    }

    pub fn with_inflation_seq(mut self, seq: u64) -> Self {
        self.inflation_seq = seq;
        self
    }
}
