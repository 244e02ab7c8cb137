use ledger_inflation::{
    apply_inflation, winner_share, DistributionConfig, InMemoryLedger, InflationOutcome,
    Payout, VoteTally, INFLATION_FREQUENCY, INFLATION_NUM_WINNERS, INFLATION_START_TIME,
    MIN_VOTER_BALANCE,
};
use ledger_types::{AccountEntry, AccountId, LedgerAggregates};
use proptest::prelude::*;

// Property-based tests for the inflation run
// Conservation, floor rounding, supply accounting and the time gate must hold
// for any ledger, not just the hand-picked ones in the smoke test.

/// Destinations 1..=4 exist, 5..=6 never do.
const EXISTING_DESTS: u8 = 4;
const ALL_DESTS: u8 = 6;
const BUDGET_SEED: u8 = 50;

fn account(seed: u8) -> AccountId {
    let mut id = [0u8; 32];
    id[0] = seed;
    AccountId(id)
}

fn arbitrary_voters() -> impl Strategy<Value = Vec<(i64, u8)>> {
    prop::collection::vec((1i64..=1_000, 1u8..=ALL_DESTS), 1..20)
}

fn build_ledger(voters: &[(i64, u8)], with_budget: bool) -> InMemoryLedger {
    let mut ledger = InMemoryLedger::from_entries((1..=EXISTING_DESTS).map(|d| AccountEntry::new(account(d), 0)));
    for (i, (units, dest)) in voters.iter().enumerate() {
        ledger.insert(
            AccountEntry::new(account(100 + i as u8), units * MIN_VOTER_BALANCE)
                .voting_for(account(*dest)),
        );
    }
    if with_budget {
        ledger.insert(AccountEntry::new(account(BUDGET_SEED), 0));
    }
    ledger
}

fn report_of(outcome: InflationOutcome) -> ledger_inflation::InflationReport {
    match outcome {
        InflationOutcome::Success(report) => report,
        InflationOutcome::NotTime => panic!("run was due"),
    }
}

proptest! {
    #[test]
    fn legacy_run_conserves_the_dole(
        voters in arbitrary_voters(),
        fee_pool in 0u64..=1_000_000_000_000,
        extra in 0u64..=1_000_000_000_000,
        version in 1u32..=12,
    ) {
        let mut ledger = build_ledger(&voters, false);
        let before_ledger = ledger.clone();
        let total_coins = ledger.total_balance() as u64 + fee_pool + extra;
        let mut agg = LedgerAggregates::new(total_coins, fee_pool, INFLATION_START_TIME, version);

        let report = report_of(
            apply_inflation(&mut ledger, &mut agg, &DistributionConfig::legacy()).unwrap(),
        );

        let paid: i64 = report.payouts.iter().map(|p| p.amount).sum();
        prop_assert_eq!(paid as u64 + agg.fee_pool, report.amount_to_dole as u64);
        prop_assert_eq!(agg.inflation_seq, 1);
        prop_assert_eq!(ledger.total_balance(), before_ledger.total_balance() + paid as i128);
        if version <= 7 {
            prop_assert_eq!(agg.total_coins, total_coins + paid as u64);
        } else {
            prop_assert_eq!(agg.total_coins, total_coins + report.inflation_amount);
        }

        // every payout is the floored share of an existing destination, in tally order
        let plan_min = report.total_votes as i128 * 500_000_000 / 1_000_000_000_000;
        let expected: Vec<Payout> = before_ledger
            .inflation_votes(plan_min as i64, INFLATION_NUM_WINNERS)
            .filter(|c| before_ledger.get(&c.destination).is_some())
            .map(|c| {
                let share = (report.amount_to_dole as i128 * c.votes as i128
                    / report.total_votes as i128) as i64;
                Payout::new(c.destination, share)
            })
            .filter(|p| p.amount > 0)
            .collect();
        prop_assert_eq!(&report.payouts, &expected);
    }
}

proptest! {
    #[test]
    fn common_budget_run_conserves_the_fee_pool(
        voters in arbitrary_voters(),
        fee_pool in 0u64..=1_000_000_000_000,
        extra in 1u64..=1_000_000_000_000,
        with_budget in any::<bool>(),
        exclude_first in any::<bool>(),
        max_winners in 0usize..=5,
    ) {
        let mut ledger = build_ledger(&voters, with_budget);
        let before_balance = ledger.total_balance();
        let total_coins = before_balance as u64 + fee_pool + extra;
        let mut agg = LedgerAggregates::new(total_coins, fee_pool, INFLATION_START_TIME, 9);
        let mut config = DistributionConfig::common_budget(account(BUDGET_SEED), 0, max_winners);
        if exclude_first {
            config = config.with_excluded([account(100)]);
        }

        let report = report_of(apply_inflation(&mut ledger, &mut agg, &config).unwrap());

        let winner_total = report.winner_total();
        prop_assert_eq!(
            winner_total + report.common_budget_credit + report.unclaimed,
            fee_pool as i64
        );
        prop_assert!(report.payouts.len() <= max_winners + 1);
        prop_assert!(winner_total <= report.amount_to_dole);
        prop_assert_eq!(agg.total_coins, total_coins);
        prop_assert_eq!(agg.fee_pool, 0);
        prop_assert_eq!(agg.inflation_seq, 1);
        if with_budget {
            prop_assert_eq!(report.unclaimed, 0);
        } else {
            prop_assert_eq!(report.common_budget_credit, 0);
        }
        prop_assert_eq!(
            ledger.total_balance(),
            before_balance + (winner_total + report.common_budget_credit) as i128
        );
    }
}

proptest! {
    #[test]
    fn gate_is_exactly_the_due_time(
        seq in 0u64..100_000,
        offset in -1_000i64..1_000,
    ) {
        let due = INFLATION_START_TIME + seq * INFLATION_FREQUENCY;
        let close_time = (due as i64 + offset) as u64;
        let mut ledger = build_ledger(&[(10, 1)], false);
        let before_ledger = ledger.clone();
        let mut agg = LedgerAggregates::new(100 * MIN_VOTER_BALANCE as u64, 500, close_time, 8)
            .with_inflation_seq(seq);
        let before_agg = agg.clone();

        let outcome = apply_inflation(&mut ledger, &mut agg, &DistributionConfig::legacy()).unwrap();

        if close_time < due {
            prop_assert_eq!(outcome, InflationOutcome::NotTime);
            prop_assert_eq!(&agg, &before_agg);
            prop_assert_eq!(&ledger, &before_ledger);
        } else {
            prop_assert!(outcome.is_success());
            prop_assert_eq!(agg.inflation_seq, seq + 1);
        }
    }
}

proptest! {
    #[test]
    fn winner_share_is_floor_of_exact_ratio(
        dole in 0i64..=i64::MAX / 2,
        total in 1i64..=i64::MAX,
        frac in 0u32..=1_000,
    ) {
        let votes = (total as i128 * frac as i128 / 1_000) as i64;
        let plan = ledger_inflation::DistributionPlan {
            scheme: ledger_inflation::Scheme::Legacy,
            total_votes: total,
            min_balance: 0,
            max_winners: 1,
            inflation_amount: 0,
            amount_to_dole: dole,
            leftover: dole,
        };
        let share = winner_share(&plan, votes).unwrap();
        let exact = dole as i128 * votes as i128 / total as i128;
        prop_assert_eq!(share as i128, exact);
        prop_assert!(share >= 0 && share <= dole);
    }
}
