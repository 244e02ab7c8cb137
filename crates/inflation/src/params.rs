//! Protocol constants for the inflation schedule.
//!
//! These are part of consensus: changing any of them changes ledger history.

/// Seconds between inflation runs (every 5 minutes).
pub const INFLATION_FREQUENCY: u64 = 60 * 5;

/// First inflation run may happen at 1-jul-2014 00:00:00 UTC.
pub const INFLATION_START_TIME: u64 = 1_404_172_800;

/// Fixed-point denominator for the rate constants below.
pub const TRILLION: i64 = 1_000_000_000_000;

/// Per-run inflation rate in trillionths (.000190721 per run).
pub const INFLATION_RATE_TRILLIONTHS: i64 = 190_721_000;

/// Minimum share of all votes a destination needs to win, in trillionths (.05%).
pub const INFLATION_WIN_MIN_PERCENT: i64 = 500_000_000;

/// Maximum number of winners paid by the legacy scheme.
pub const INFLATION_NUM_WINNERS: usize = 2000;

/// Last ledger version that grows `total_coins` by each credited payout
/// instead of by the nominal inflation amount.
pub const LEGACY_PER_PAYOUT_SUPPLY_MAX_VERSION: u32 = 7;

/// Share of the fee pool handed to voters under the common-budget scheme,
/// as numerator / denominator. The rest goes to the common budget account.
pub const COMMON_BUDGET_DOLE_NUMER: u64 = 7;
pub const COMMON_BUDGET_DOLE_DENOM: u64 = 10;

/// Smallest balance an account must hold for its votes to be tallied
/// (100 whole units at 7 decimal places).
pub const MIN_VOTER_BALANCE: i64 = 1_000_000_000;
