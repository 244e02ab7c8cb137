//! The inflation operation
//!
//! Anyone holding a low-threshold signature may submit it; whether it does
//! anything is decided purely by the ledger close time. A run either returns
//! `NotTime` without touching state, or commits every credit and aggregate
//! update together.

use crate::bookkeeping::SupplyBookkeeper;
use crate::config::{DistributionConfig, Scheme};
use crate::eligibility::{inflation_due_for, next_inflation_time};
use crate::errors::InflationError;
use crate::ledger::{InflationLedger, LedgerDelta};
use crate::payout::{dole_to_winners, Payout};
use crate::scheme::{enumerate_winners, plan_distribution};
use ledger_types::{AccountId, LedgerAggregates, ThresholdLevel};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Counter bumped when inflation is submitted before it is due.
pub const METRIC_NOT_TIME: &str = "op_inflation_failure_not_time";
/// Counter bumped when an inflation run is applied.
pub const METRIC_APPLIED: &str = "op_inflation_success_apply";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InflationResultCode {
    InflationSuccess,
    InflationNotTime,
}

/// Summary of an applied run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflationReport {
    pub scheme: Scheme,
    /// Credits in the order applied; the common budget credit, if any, is last.
    pub payouts: Vec<Payout>,
    /// Sequence number after this run.
    pub inflation_seq: u64,
    pub total_votes: i64,
    pub amount_to_dole: i64,
    /// Nominal newly minted amount (0 for the common budget scheme).
    pub inflation_amount: u64,
    /// Actual change in `total_coins`.
    pub supply_delta: u64,
    pub returned_to_fee_pool: u64,
    pub common_budget_credit: i64,
    /// Remainder nobody received because the common budget account is missing.
    pub unclaimed: i64,
}

impl InflationReport {
    /// Sum of credits to voted winners, excluding the common budget credit.
    pub fn winner_total(&self) -> i64 {
        let all: i64 = self.payouts.iter().map(|p| p.amount).sum();
        all - self.common_budget_credit
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InflationOutcome {
    NotTime,
    Success(InflationReport),
}

impl InflationOutcome {
    pub fn code(&self) -> InflationResultCode {
        match self {
            Self::NotTime => InflationResultCode::InflationNotTime,
            Self::Success(_) => InflationResultCode::InflationSuccess,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn report(&self) -> Option<&InflationReport> {
        match self {
            Self::Success(report) => Some(report),
            Self::NotTime => None,
        }
    }
}

/// Inflation operation submitted by `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflationOp {
    pub source: AccountId,
}

impl InflationOp {
    pub fn new(source: AccountId) -> Self {
        Self { source }
    }

    pub fn threshold_level(&self) -> ThresholdLevel {
        ThresholdLevel::Low
    }

    /// The operation has no body, so it is always well formed.
    pub fn check_valid(&self) -> bool {
        true
    }

    pub fn apply<L: InflationLedger + ?Sized>(
        &self,
        ledger: &mut L,
        aggregates: &mut LedgerAggregates,
        config: &DistributionConfig,
    ) -> Result<InflationOutcome, InflationError> {
        debug!(source = %self.source, seq = aggregates.inflation_seq, "Applying inflation op");
        apply_inflation(ledger, aggregates, config)
    }
}

/// Run inflation against `ledger` and `aggregates`.
///
/// On `Ok(NotTime)` and on every `Err` nothing has been written. Errors are
/// fatal; see [`InflationError::is_fatal`].
pub fn apply_inflation<L: InflationLedger + ?Sized>(
    ledger: &mut L,
    aggregates: &mut LedgerAggregates,
    config: &DistributionConfig,
) -> Result<InflationOutcome, InflationError> {
    if !inflation_due_for(aggregates) {
        counter!(METRIC_NOT_TIME).increment(1);
        debug!(
            close_time = aggregates.close_time,
            seq = aggregates.inflation_seq,
            due = ?next_inflation_time(aggregates.inflation_seq),
            "Inflation not due yet"
        );
        return Ok(InflationOutcome::NotTime);
    }

    let plan = plan_distribution(aggregates, config, &*ledger)?;
    let winners = enumerate_winners(&*ledger, &plan, config);
    let bookkeeper = SupplyBookkeeper::new(&plan, aggregates.ledger_version);
    let coins_before = aggregates.total_coins;

    let mut delta = LedgerDelta::new(ledger, aggregates);
    bookkeeper.open(delta.header_mut());

    let mut leftover = plan.leftover;
    let mut payouts = dole_to_winners(&mut delta, &winners, &plan, &bookkeeper, &mut leftover)?;
    let settlement = bookkeeper.settle(&mut delta, leftover)?;

    let common_budget_credit = settlement.common_budget_credit.map_or(0, |p| p.amount);
    payouts.extend(settlement.common_budget_credit);

    let header = delta.header();
    let report = InflationReport {
        scheme: plan.scheme,
        payouts,
        inflation_seq: header.inflation_seq,
        total_votes: plan.total_votes,
        amount_to_dole: plan.amount_to_dole,
        inflation_amount: plan.inflation_amount,
        supply_delta: header.total_coins - coins_before,
        returned_to_fee_pool: settlement.returned_to_fee_pool,
        common_budget_credit,
        unclaimed: settlement.unclaimed,
    };

    let accounts_credited = delta.touched_accounts();
    delta.commit();
    counter!(METRIC_APPLIED).increment(1);

    info!(
        seq = report.inflation_seq,
        scheme = ?report.scheme,
        supply_rule = ?bookkeeper.rule(),
        winners = winners.len(),
        paid = report.payouts.len(),
        accounts_credited,
        amount_to_dole = report.amount_to_dole,
        supply_delta = report.supply_delta,
        returned_to_fee_pool = report.returned_to_fee_pool,
        common_budget_credit = report.common_budget_credit,
        "Inflation applied"
    );

    Ok(InflationOutcome::Success(report))
}
