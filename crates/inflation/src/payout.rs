//! Proportional payout engine
//!
//! Each winner receives `floor(amount_to_dole * votes / total_votes)`, in tally
//! order. Shares that round to zero and destinations that no longer exist are
//! skipped and stay in the leftover accumulator.

use crate::bookkeeping::SupplyBookkeeper;
use crate::errors::InflationError;
use crate::ledger::{AccountLedger, CandidateVote, LedgerDelta};
use crate::scheme::DistributionPlan;
use ledger_types::{big_divide, AccountId, Rounding};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// A credit applied by an inflation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub destination: AccountId,
    pub amount: i64,
}

impl Payout {
    pub fn new(destination: AccountId, amount: i64) -> Self {
        Self {
            destination,
            amount,
        }
    }
}

/// Winner's share of the dole, rounded down.
pub fn winner_share(plan: &DistributionPlan, votes: i64) -> Result<i64, InflationError> {
    if votes <= 0 {
        return Ok(0);
    }
    big_divide(plan.amount_to_dole, votes, plan.total_votes, Rounding::Down)
        .ok_or(InflationError::ArithmeticOverflow("winner share"))
}

/// Credit every winner its share through `delta`.
///
/// `leftover` is decremented by each credited amount. Returns the payout
/// records in tally order.
pub fn dole_to_winners<L: AccountLedger + ?Sized>(
    delta: &mut LedgerDelta<'_, L>,
    winners: &[CandidateVote],
    plan: &DistributionPlan,
    bookkeeper: &SupplyBookkeeper,
    leftover: &mut i64,
) -> Result<Vec<Payout>, InflationError> {
    let mut payouts = Vec::with_capacity(winners.len());

    for winner in winners {
        let share = winner_share(plan, winner.votes)?;
        if share == 0 {
            debug!(dest = %winner.destination, votes = winner.votes, "Share rounds to zero, skipping");
            continue;
        }

        {
            let Some(mut account) = delta.load_account(&winner.destination) else {
                debug!(dest = %winner.destination, share, "Destination does not exist, skipping");
                continue;
            };
            if !account.add_balance(share) {
                error!(dest = %winner.destination, share, balance = account.balance(), "Inflation overflowed destination balance");
                return Err(InflationError::BalanceOverflow {
                    account: winner.destination,
                });
            }
        }

        *leftover = leftover
            .checked_sub(share)
            .ok_or(InflationError::ArithmeticOverflow("leftover after dole"))?;
        bookkeeper.on_payout(delta.header_mut(), share)?;
        payouts.push(Payout::new(winner.destination, share));
    }

    Ok(payouts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Scheme;
    use crate::memory::InMemoryLedger;
    use ledger_types::{AccountEntry, LedgerAggregates};

    fn test_account_id(seed: u8) -> AccountId {
        let mut id = [0u8; 32];
        id[0] = seed;
        AccountId(id)
    }

    fn plan(amount_to_dole: i64, total_votes: i64) -> DistributionPlan {
        DistributionPlan {
            scheme: Scheme::Legacy,
            total_votes,
            min_balance: 0,
            max_winners: 10,
            inflation_amount: 0,
            amount_to_dole,
            leftover: amount_to_dole,
        }
    }

    #[test]
    fn test_winner_share_floors() {
        let p = plan(1_000, 3);
        assert_eq!(winner_share(&p, 1).unwrap(), 333);
        assert_eq!(winner_share(&p, 2).unwrap(), 666);
        assert_eq!(winner_share(&p, 0).unwrap(), 0);
        assert_eq!(winner_share(&p, -5).unwrap(), 0);
    }

    #[test]
    fn test_winner_share_uses_wide_product() {
        // amount * votes is far beyond 64 bits
        let p = plan(i64::MAX / 2, i64::MAX);
        assert_eq!(winner_share(&p, i64::MAX).unwrap(), i64::MAX / 2);
    }

    #[test]
    fn test_dole_skips_zero_and_unresolved() {
        let (a, b, ghost) = (test_account_id(1), test_account_id(2), test_account_id(3));
        let mut ledger =
            InMemoryLedger::from_entries([AccountEntry::new(a, 10), AccountEntry::new(b, 0)]);
        let mut agg = LedgerAggregates::new(1_000, 0, 0, 8);
        let p = plan(100, 1_000);
        let winners = vec![
            CandidateVote::new(a, 500),
            CandidateVote::new(ghost, 400),
            CandidateVote::new(b, 9), // 100 * 9 / 1000 = 0
        ];
        let bookkeeper = SupplyBookkeeper::new(&p, 8);

        let mut delta = LedgerDelta::new(&mut ledger, &mut agg);
        let mut leftover = p.leftover;
        let payouts = dole_to_winners(&mut delta, &winners, &p, &bookkeeper, &mut leftover).unwrap();
        delta.commit();

        assert_eq!(payouts, vec![Payout::new(a, 50)]);
        assert_eq!(leftover, 50);
        assert_eq!(ledger.get(&a).unwrap().balance, 60);
        assert_eq!(ledger.get(&b).unwrap().balance, 0);
    }

    #[test]
    fn test_dole_preserves_tally_order() {
        let ids: Vec<_> = (1..=4).map(test_account_id).collect();
        let mut ledger =
            InMemoryLedger::from_entries(ids.iter().map(|id| AccountEntry::new(*id, 0)));
        let mut agg = LedgerAggregates::default();
        let p = plan(1_000, 100);
        // deliberately not sorted by votes
        let winners: Vec<_> = ids
            .iter()
            .zip([10, 40, 20, 30])
            .map(|(id, v)| CandidateVote::new(*id, v))
            .collect();
        let bookkeeper = SupplyBookkeeper::new(&p, 8);

        let mut delta = LedgerDelta::new(&mut ledger, &mut agg);
        let mut leftover = p.leftover;
        let payouts = dole_to_winners(&mut delta, &winners, &p, &bookkeeper, &mut leftover).unwrap();

        assert_eq!(payouts.iter().map(|p| p.destination).collect::<Vec<_>>(), ids);
        assert_eq!(leftover, 0);
    }

    #[test]
    fn test_dole_overflow_is_fatal() {
        let whale = test_account_id(7);
        let mut ledger = InMemoryLedger::from_entries([AccountEntry::new(whale, i64::MAX)]);
        let mut agg = LedgerAggregates::default();
        let p = plan(10, 10);
        let bookkeeper = SupplyBookkeeper::new(&p, 8);

        let mut delta = LedgerDelta::new(&mut ledger, &mut agg);
        let mut leftover = p.leftover;
        let err = dole_to_winners(
            &mut delta,
            &[CandidateVote::new(whale, 10)],
            &p,
            &bookkeeper,
            &mut leftover,
        )
        .unwrap_err();
        assert_eq!(err, InflationError::BalanceOverflow { account: whale });
        assert!(err.is_fatal());
    }
}
