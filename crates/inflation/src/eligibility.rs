//! Inflation timing gate
//!
//! Inflation run `seq` becomes due at `INFLATION_START_TIME + seq * INFLATION_FREQUENCY`.
//! Only the consensus close time of the ledger is consulted, never the wall
//! clock, so every node reaches the same answer.

use crate::params::{INFLATION_FREQUENCY, INFLATION_START_TIME};
use ledger_types::LedgerAggregates;

/// Close time at which inflation run `seq` becomes due.
///
/// `None` means the due time is beyond the representable range, i.e. never.
pub fn next_inflation_time(seq: u64) -> Option<u64> {
    seq.checked_mul(INFLATION_FREQUENCY)?
        .checked_add(INFLATION_START_TIME)
}

/// Whether a ledger closing at `close_time` may run inflation number `seq`.
pub fn is_inflation_due(close_time: u64, seq: u64) -> bool {
    match next_inflation_time(seq) {
        Some(due) => close_time >= due,
        None => false,
    }
}

/// Gate check against the ledger aggregates.
pub fn inflation_due_for(aggregates: &LedgerAggregates) -> bool {
    is_inflation_due(aggregates.close_time, aggregates.inflation_seq)
}
