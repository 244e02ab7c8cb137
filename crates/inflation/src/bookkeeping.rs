//! Supply and fee-pool bookkeeping
//!
//! How `total_coins` moves depends on the scheme and, for the legacy scheme,
//! on the ledger version. Ledgers at version 7 and below grew the supply by
//! each credited payout; later versions grow it by the nominal inflation
//! amount. Both rules stay: replaying old ledgers must reproduce their
//! headers exactly.

use crate::config::Scheme;
use crate::errors::InflationError;
use crate::ledger::{AccountLedger, LedgerDelta};
use crate::params::LEGACY_PER_PAYOUT_SUPPLY_MAX_VERSION;
use crate::payout::Payout;
use crate::scheme::DistributionPlan;
use ledger_types::LedgerAggregates;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Rule for growing `total_coins` during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplyRule {
    /// Legacy, version <= 7: add each credited payout as it is applied.
    PerPayout,
    /// Legacy, version > 7: add the nominal inflation amount once.
    Nominal,
    /// Common budget: supply never changes.
    Unchanged,
}

impl SupplyRule {
    pub fn for_run(scheme: &Scheme, ledger_version: u32) -> Self {
        match scheme {
            Scheme::CommonBudget { .. } => Self::Unchanged,
            Scheme::Legacy if ledger_version <= LEGACY_PER_PAYOUT_SUPPLY_MAX_VERSION => {
                Self::PerPayout
            }
            Scheme::Legacy => Self::Nominal,
        }
    }
}

/// Where the undistributed remainder of a run went.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Added back to the fee pool (legacy).
    pub returned_to_fee_pool: u64,
    /// Credited to the common budget account (common budget, resolved).
    pub common_budget_credit: Option<Payout>,
    /// Left undistributed because the common budget account does not exist.
    pub unclaimed: i64,
}

#[derive(Debug, Clone)]
pub struct SupplyBookkeeper {
    scheme: Scheme,
    rule: SupplyRule,
    inflation_amount: u64,
}

impl SupplyBookkeeper {
    pub fn new(plan: &DistributionPlan, ledger_version: u32) -> Self {
        Self {
            scheme: plan.scheme,
            rule: SupplyRule::for_run(&plan.scheme, ledger_version),
            inflation_amount: plan.inflation_amount,
        }
    }

    pub fn rule(&self) -> SupplyRule {
        self.rule
    }

    /// Start of the run: the fee pool is drained into the plan's leftover.
    pub fn open(&self, header: &mut LedgerAggregates) {
        header.fee_pool = 0;
    }

    /// Called once per credited winner payout.
    pub fn on_payout(&self, header: &mut LedgerAggregates, amount: i64) -> Result<(), InflationError> {
        if self.rule == SupplyRule::PerPayout {
            header.total_coins = add_amount(header.total_coins, amount)
                .ok_or(InflationError::SupplyOverflow("total coins"))?;
        }
        Ok(())
    }

    /// Route the leftover to the scheme's sink, apply the nominal supply rule
    /// and advance the inflation sequence.
    pub fn settle<L: AccountLedger + ?Sized>(
        &self,
        delta: &mut LedgerDelta<'_, L>,
        leftover: i64,
    ) -> Result<Settlement, InflationError> {
        let settlement = match self.scheme {
            Scheme::Legacy => {
                let returned = u64::try_from(leftover)
                    .map_err(|_| InflationError::ArithmeticOverflow("negative leftover"))?;
                let header = delta.header_mut();
                header.fee_pool = header
                    .fee_pool
                    .checked_add(returned)
                    .ok_or(InflationError::SupplyOverflow("fee pool"))?;
                if self.rule == SupplyRule::Nominal {
                    header.total_coins = header
                        .total_coins
                        .checked_add(self.inflation_amount)
                        .ok_or(InflationError::SupplyOverflow("total coins"))?;
                }
                Settlement {
                    returned_to_fee_pool: returned,
                    ..Settlement::default()
                }
            }
            Scheme::CommonBudget { account } => {
                credit_common_budget(delta, account, leftover)?
            }
        };

        let header = delta.header_mut();
        header.inflation_seq = header
            .inflation_seq
            .checked_add(1)
            .ok_or(InflationError::SupplyOverflow("inflation sequence"))?;

        Ok(settlement)
    }
}

fn credit_common_budget<L: AccountLedger + ?Sized>(
    delta: &mut LedgerDelta<'_, L>,
    account: ledger_types::AccountId,
    amount: i64,
) -> Result<Settlement, InflationError> {
    if amount < 0 {
        return Err(InflationError::ArithmeticOverflow("negative leftover"));
    }

    let Some(mut budget) = delta.load_account(&account) else {
        warn!(budget = %account, amount, "Common budget account does not exist, leaving remainder undistributed");
        return Ok(Settlement {
            unclaimed: amount,
            ..Settlement::default()
        });
    };

    if !budget.add_balance(amount) {
        error!(budget = %account, amount, balance = budget.balance(), "Inflation overflowed common budget account balance");
        return Err(InflationError::CommonBudgetOverflow { account });
    }

    Ok(Settlement {
        common_budget_credit: Some(Payout::new(account, amount)),
        ..Settlement::default()
    })
}

fn add_amount(total: u64, amount: i64) -> Option<u64> {
    u64::try_from(amount).ok().and_then(|a| total.checked_add(a))
}
