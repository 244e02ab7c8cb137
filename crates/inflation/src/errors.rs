use ledger_types::AccountId;
use thiserror::Error;

/// Conditions that abort an inflation run.
///
/// None of these is an ordinary outcome. Each one means the ledger state or
/// the node configuration violates an invariant that every validating node
/// relies on, so the host must stop rather than close the ledger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InflationError {
    #[error("total votes must be positive, got {total_votes}")]
    NonPositiveVotes { total_votes: i128 },

    #[error("inflation overflowed destination balance of {account}")]
    BalanceOverflow { account: AccountId },

    #[error("inflation overflowed common budget account balance of {account}")]
    CommonBudgetOverflow { account: AccountId },

    #[error("ledger supply aggregate overflowed: {0}")]
    SupplyOverflow(&'static str),

    #[error("arithmetic overflow while computing inflation: {0}")]
    ArithmeticOverflow(&'static str),
}

impl InflationError {
    /// Every variant is fatal; callers must never turn one into a failed
    /// operation result and keep applying the ledger.
    pub fn is_fatal(&self) -> bool {
        true
    }
}

/// Errors raised while loading a [`crate::DistributionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration source error: {0}")]
    Source(#[from] config::ConfigError),

    #[error("configuration file {0} not found")]
    MissingFile(String),

    #[error("invalid distribution config: {0}")]
    Invalid(String),
}
