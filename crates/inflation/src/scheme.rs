//! Scheme selection and per-scheme distribution parameters
//!
//! Both schemes reduce to the same shape: a vote denominator, a winner
//! threshold and cap, the amount handed to winners, and the starting value of
//! the leftover accumulator that ends up in the scheme's sink.

use crate::config::{DistributionConfig, Scheme};
use crate::errors::InflationError;
use crate::ledger::{AccountLedger, CandidateVote, VoteTally};
use crate::params::{
    COMMON_BUDGET_DOLE_DENOM, COMMON_BUDGET_DOLE_NUMER, INFLATION_NUM_WINNERS,
    INFLATION_RATE_TRILLIONTHS, INFLATION_WIN_MIN_PERCENT, TRILLION,
};
use ledger_types::{big_divide, big_divide_u64, LedgerAggregates, Rounding};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters of one distribution, fixed before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionPlan {
    pub scheme: Scheme,
    /// Denominator of every winner's share.
    pub total_votes: i64,
    /// Smallest vote count that can win.
    pub min_balance: i64,
    pub max_winners: usize,
    /// Newly minted coins (always 0 for the common-budget scheme).
    pub inflation_amount: u64,
    /// Amount split among winners in proportion to their votes.
    pub amount_to_dole: i64,
    /// Initial value of the undistributed remainder.
    pub leftover: i64,
}

/// Build the plan for whichever scheme `config` selects.
pub fn plan_distribution<L: AccountLedger + ?Sized>(
    aggregates: &LedgerAggregates,
    config: &DistributionConfig,
    ledger: &L,
) -> Result<DistributionPlan, InflationError> {
    match config.scheme() {
        Scheme::Legacy => legacy_plan(aggregates),
        Scheme::CommonBudget { account } => {
            common_budget_plan(aggregates, config, account, ledger)
        }
    }
}

/// Legacy scheme: every coin votes, winners need .05% of all coins, and the
/// dole is the freshly minted amount plus the whole fee pool.
pub fn legacy_plan(aggregates: &LedgerAggregates) -> Result<DistributionPlan, InflationError> {
    let total_votes = i64::try_from(aggregates.total_coins)
        .map_err(|_| InflationError::ArithmeticOverflow("total coins exceed vote range"))?;
    if total_votes <= 0 {
        return Err(InflationError::NonPositiveVotes {
            total_votes: total_votes as i128,
        });
    }

    let min_balance = big_divide(
        total_votes,
        INFLATION_WIN_MIN_PERCENT,
        TRILLION,
        Rounding::Down,
    )
    .ok_or(InflationError::ArithmeticOverflow("minimum winning balance"))?;

    let inflation_amount = big_divide_u64(
        aggregates.total_coins,
        INFLATION_RATE_TRILLIONTHS as u64,
        TRILLION as u64,
        Rounding::Down,
    )
    .ok_or(InflationError::ArithmeticOverflow("inflation amount"))?;

    let amount_to_dole = inflation_amount
        .checked_add(aggregates.fee_pool)
        .and_then(|v| i64::try_from(v).ok())
        .ok_or(InflationError::ArithmeticOverflow("inflation amount plus fee pool"))?;

    debug!(
        total_votes,
        min_balance, inflation_amount, amount_to_dole, "Planned legacy inflation"
    );

    Ok(DistributionPlan {
        scheme: Scheme::Legacy,
        total_votes,
        min_balance,
        max_winners: INFLATION_NUM_WINNERS,
        inflation_amount,
        amount_to_dole,
        leftover: amount_to_dole,
    })
}

/// Common-budget scheme: votes exclude the fee pool and the excluded
/// accounts, 70% of the fee pool goes to winners and everything else to the
/// common budget account.
pub fn common_budget_plan<L: AccountLedger + ?Sized>(
    aggregates: &LedgerAggregates,
    config: &DistributionConfig,
    account: ledger_types::AccountId,
    ledger: &L,
) -> Result<DistributionPlan, InflationError> {
    let excluded_balance: i128 = config
        .excluded_accounts
        .iter()
        .filter_map(|id| ledger.balance(id))
        .map(i128::from)
        .sum();

    let votes_wide =
        aggregates.total_coins as i128 - aggregates.fee_pool as i128 - excluded_balance;
    if votes_wide <= 0 {
        return Err(InflationError::NonPositiveVotes {
            total_votes: votes_wide,
        });
    }
    let total_votes = i64::try_from(votes_wide)
        .map_err(|_| InflationError::ArithmeticOverflow("total votes exceed vote range"))?;

    let amount_to_dole = big_divide_u64(
        aggregates.fee_pool,
        COMMON_BUDGET_DOLE_NUMER,
        COMMON_BUDGET_DOLE_DENOM,
        Rounding::Down,
    )
    .and_then(|v| i64::try_from(v).ok())
    .ok_or(InflationError::ArithmeticOverflow("common budget dole"))?;

    let leftover = i64::try_from(aggregates.fee_pool)
        .map_err(|_| InflationError::ArithmeticOverflow("fee pool exceeds amount range"))?;

    debug!(
        total_votes,
        excluded_balance = excluded_balance as i64,
        amount_to_dole,
        budget = %account,
        "Planned common budget inflation"
    );

    Ok(DistributionPlan {
        scheme: Scheme::CommonBudget { account },
        total_votes,
        min_balance: config.min_balance,
        max_winners: config.max_winners,
        inflation_amount: 0,
        amount_to_dole,
        leftover,
    })
}

/// Pull the winners for `plan` from the scheme's tally.
///
/// Candidates are accepted in tally order while they meet the threshold, up
/// to the winner cap.
pub fn enumerate_winners<T: VoteTally + ?Sized>(
    tally: &T,
    plan: &DistributionPlan,
    config: &DistributionConfig,
) -> Vec<CandidateVote> {
    let stream = match plan.scheme {
        Scheme::Legacy => tally.inflation_votes(plan.min_balance, plan.max_winners),
        Scheme::CommonBudget { .. } => tally.common_budget_votes(
            plan.min_balance,
            &config.excluded_accounts,
            plan.max_winners,
        ),
    };

    stream
        .take_while(|c| c.votes >= plan.min_balance)
        .take(plan.max_winners)
        .collect()
}
