//! In-memory ledger for the CLI host, simulation and tests
//!
//! Holds account records and answers both vote tallies from them the same way
//! a database-backed ledger would.

use crate::ledger::{AccountLedger, CandidateVote, VoteStream, VoteTally};
use crate::params::MIN_VOTER_BALANCE;
use ledger_types::{AccountEntry, AccountId, LedgerAggregates};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryLedger {
    accounts: BTreeMap<AccountId, AccountEntry>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = AccountEntry>) -> Self {
        let mut ledger = Self::new();
        for entry in entries {
            ledger.insert(entry);
        }
        ledger
    }

    pub fn insert(&mut self, entry: AccountEntry) {
        self.accounts.insert(entry.account_id, entry);
    }

    pub fn get(&self, id: &AccountId) -> Option<&AccountEntry> {
        self.accounts.get(id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &AccountEntry> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of all balances, widened so it cannot overflow.
    pub fn total_balance(&self) -> i128 {
        self.accounts.values().map(|a| a.balance as i128).sum()
    }

    /// Votes per destination, ordered by votes then destination, both descending.
    fn tally(
        &self,
        min_votes: i64,
        excluded: Option<&BTreeSet<AccountId>>,
        limit: usize,
    ) -> Vec<CandidateVote> {
        let is_excluded = |id: &AccountId| excluded.is_some_and(|set| set.contains(id));

        let mut votes: BTreeMap<AccountId, i64> = BTreeMap::new();
        for account in self.accounts.values() {
            let Some(dest) = account.inflation_dest else {
                continue;
            };
            if account.balance < MIN_VOTER_BALANCE
                || is_excluded(&account.account_id)
                || is_excluded(&dest)
            {
                continue;
            }
            let entry = votes.entry(dest).or_insert(0);
            *entry = entry.saturating_add(account.balance);
        }

        let mut ranked: Vec<CandidateVote> = votes
            .into_iter()
            .filter(|(_, v)| *v >= min_votes)
            .map(|(destination, votes)| CandidateVote { destination, votes })
            .collect();
        ranked.sort_by_key(|c| Reverse((c.votes, c.destination)));
        ranked.truncate(limit);
        ranked
    }
}

impl AccountLedger for InMemoryLedger {
    fn balance(&self, id: &AccountId) -> Option<i64> {
        self.accounts.get(id).map(|a| a.balance)
    }

    fn store_balance(&mut self, id: &AccountId, balance: i64) {
        self.accounts
            .entry(*id)
            .and_modify(|a| a.balance = balance)
            .or_insert_with(|| AccountEntry::new(*id, balance));
    }
}

impl VoteTally for InMemoryLedger {
    fn inflation_votes(&self, min_votes: i64, limit: usize) -> VoteStream<'_> {
        Box::new(self.tally(min_votes, None, limit).into_iter())
    }

    fn common_budget_votes(
        &self,
        min_votes: i64,
        excluded: &BTreeSet<AccountId>,
        limit: usize,
    ) -> VoteStream<'_> {
        Box::new(self.tally(min_votes, Some(excluded), limit).into_iter())
    }
}

/// Serialised ledger state: aggregates plus every account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub aggregates: LedgerAggregates,
    #[serde(default)]
    pub accounts: Vec<AccountEntry>,
}

impl LedgerSnapshot {
    pub fn capture(ledger: &InMemoryLedger, aggregates: &LedgerAggregates) -> Self {
        Self {
            aggregates: aggregates.clone(),
            accounts: ledger.entries().cloned().collect(),
        }
    }

    pub fn into_parts(self) -> (InMemoryLedger, LedgerAggregates) {
        (InMemoryLedger::from_entries(self.accounts), self.aggregates)
    }
}
