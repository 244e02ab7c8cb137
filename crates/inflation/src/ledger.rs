//! Ledger collaborators and the scoped mutation overlay
//!
//! The inflation run never writes to the ledger directly. It stages every
//! balance credit and the updated aggregates in a [`LedgerDelta`], which
//! either commits them all at once or is dropped and leaves nothing behind.

use ledger_types::{AccountId, LedgerAggregates};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Aggregated voting weight for one inflation destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateVote {
    pub destination: AccountId,
    pub votes: i64,
}

impl CandidateVote {
    pub fn new(destination: AccountId, votes: i64) -> Self {
        Self { destination, votes }
    }
}

/// Ordered, single-pass stream of candidates (descending votes).
pub type VoteStream<'a> = Box<dyn Iterator<Item = CandidateVote> + 'a>;

/// Account storage as seen by the inflation run.
pub trait AccountLedger {
    /// Current balance, or `None` if the account does not exist.
    fn balance(&self, id: &AccountId) -> Option<i64>;

    /// Overwrite the balance of an existing account.
    fn store_balance(&mut self, id: &AccountId, balance: i64);
}

/// Vote tally over the committed ledger state.
///
/// Implementations return candidates with `votes >= min_votes`, ordered by
/// descending votes, at most `limit` of them.
pub trait VoteTally {
    /// Whole-ledger tally used by the legacy scheme.
    fn inflation_votes(&self, min_votes: i64, limit: usize) -> VoteStream<'_>;

    /// Tally that ignores `excluded` accounts, used by the common-budget scheme.
    fn common_budget_votes(
        &self,
        min_votes: i64,
        excluded: &BTreeSet<AccountId>,
        limit: usize,
    ) -> VoteStream<'_>;
}

/// Everything an inflation run needs from the ledger.
pub trait InflationLedger: AccountLedger + VoteTally {}

impl<T: AccountLedger + VoteTally + ?Sized> InflationLedger for T {}

/// Staged aggregates plus touched balances over a borrowed ledger.
pub struct LedgerDelta<'a, L: AccountLedger + ?Sized> {
    ledger: &'a mut L,
    target: &'a mut LedgerAggregates,
    header: LedgerAggregates,
    balances: BTreeMap<AccountId, i64>,
}

impl<'a, L: AccountLedger + ?Sized> LedgerDelta<'a, L> {
    pub fn new(ledger: &'a mut L, aggregates: &'a mut LedgerAggregates) -> Self {
        let header = aggregates.clone();
        Self {
            ledger,
            target: aggregates,
            header,
            balances: BTreeMap::new(),
        }
    }

    /// Staged aggregates.
    pub fn header(&self) -> &LedgerAggregates {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut LedgerAggregates {
        &mut self.header
    }

    /// Balance as seen through the overlay.
    pub fn balance(&self, id: &AccountId) -> Option<i64> {
        self.balances
            .get(id)
            .copied()
            .or_else(|| self.ledger.balance(id))
    }

    /// Resolve an account; `None` if it does not exist.
    pub fn load_account(&mut self, id: &AccountId) -> Option<AccountHandle<'_, 'a, L>> {
        let balance = self.balance(id)?;
        Some(AccountHandle {
            delta: self,
            id: *id,
            balance,
        })
    }

    /// Number of accounts with staged balance changes.
    pub fn touched_accounts(&self) -> usize {
        self.balances.len()
    }

    /// Publish the staged aggregates and balances together.
    pub fn commit(self) {
        for (id, balance) in &self.balances {
            self.ledger.store_balance(id, *balance);
        }
        *self.target = self.header;
    }
}

/// A resolved account inside a [`LedgerDelta`].
pub struct AccountHandle<'d, 'a, L: AccountLedger + ?Sized> {
    delta: &'d mut LedgerDelta<'a, L>,
    id: AccountId,
    balance: i64,
}

impl<L: AccountLedger + ?Sized> AccountHandle<'_, '_, L> {
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Checked credit. Returns `false`, leaving the balance untouched, if the
    /// new balance would overflow or go negative.
    pub fn add_balance(&mut self, amount: i64) -> bool {
        match self.balance.checked_add(amount) {
            Some(new_balance) if new_balance >= 0 => {
                self.balance = new_balance;
                self.delta.balances.insert(self.id, new_balance);
                true
            }
            _ => false,
        }
    }
}
