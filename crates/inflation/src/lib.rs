//! Ledger Inflation: stake-weighted distribution at ledger close
//!
//! Periodically hands newly minted coins plus collected fees to the accounts
//! that received the most votes, in proportion to their votes:
//! - time gate keyed on the ledger close time and the inflation sequence
//! - legacy scheme (mint + fee pool, version-gated supply accounting)
//! - common-budget scheme (fee pool split between voters and a budget account)
//! - floor rounding with every remainder routed to a defined sink
//! - all-or-nothing application through a scoped ledger delta
//!
//! Every error returned by [`apply_inflation`] is fatal for the node.

pub mod bookkeeping;
pub mod config;
pub mod eligibility;
pub mod errors;
pub mod ledger;
pub mod memory;
pub mod operation;
pub mod params;
pub mod payout;
pub mod scheme;

pub use bookkeeping::{Settlement, SupplyBookkeeper, SupplyRule};
pub use self::config::{DistributionConfig, Scheme};
pub use eligibility::{inflation_due_for, is_inflation_due, next_inflation_time};
pub use errors::{ConfigError, InflationError};
pub use ledger::{
    AccountHandle, AccountLedger, CandidateVote, InflationLedger, LedgerDelta, VoteStream,
    VoteTally,
};
pub use memory::{InMemoryLedger, LedgerSnapshot};
pub use operation::{
    apply_inflation, InflationOp, InflationOutcome, InflationReport, InflationResultCode,
};
pub use params::*;
pub use payout::{winner_share, Payout};
pub use scheme::{enumerate_winners, plan_distribution, DistributionPlan};

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
