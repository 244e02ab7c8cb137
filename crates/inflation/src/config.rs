//! Distribution configuration
//!
//! Read once at the start of a run. The presence of a common budget account
//! selects the common-budget scheme; otherwise the legacy scheme applies and
//! the remaining fields are ignored.

use crate::errors::ConfigError;
use crate::params::INFLATION_NUM_WINNERS;
use config::{Config, Environment, File as ConfigFile};
use ledger_types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Environment variable prefix for overrides (e.g. `INFLATION_MIN_BALANCE`).
pub const ENV_PREFIX: &str = "INFLATION";

/// Distribution scheme selected by [`DistributionConfig::scheme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Scheme {
    /// Mint `total_coins * rate` and dole it, plus the fee pool, to the top voted accounts.
    Legacy,
    /// Split the fee pool between voters and a common budget account; never mints.
    CommonBudget { account: AccountId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDistributionConfig")]
pub struct DistributionConfig {
    /// Account that receives the undistributed part of the fee pool.
    pub common_budget_account: Option<AccountId>,
    /// Minimum votes a destination needs (common-budget scheme only).
    pub min_balance: i64,
    /// Winner cap (common-budget scheme only).
    pub max_winners: usize,
    /// Accounts whose balances do not count toward total votes (common-budget scheme only).
    pub excluded_accounts: BTreeSet<AccountId>,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            common_budget_account: None,
            min_balance: 0,
            max_winners: INFLATION_NUM_WINNERS,
            excluded_accounts: BTreeSet::new(),
        }
    }
}

impl DistributionConfig {
    pub fn legacy() -> Self {
        Self::default()
    }

    pub fn common_budget(account: AccountId, min_balance: i64, max_winners: usize) -> Self {
        Self {
            common_budget_account: Some(account),
            min_balance,
            max_winners,
            excluded_accounts: BTreeSet::new(),
        }
    }

    pub fn with_excluded(mut self, accounts: impl IntoIterator<Item = AccountId>) -> Self {
        self.excluded_accounts.extend(accounts);
        self
    }

    pub fn scheme(&self) -> Scheme {
        match self.common_budget_account {
            Some(account) => Scheme::CommonBudget { account },
            None => Scheme::Legacy,
        }
    }

    /// Load from an optional file layered under `INFLATION_*` environment variables.
    ///
    /// Environment values are kept as strings: an all-digit hex account id must
    /// not be coerced into a number. `INFLATION_EXCLUDED_ACCOUNTS` takes a
    /// comma-separated list.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.display().to_string()));
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX));

        let loaded: Self = builder.build()?.try_deserialize()?;
        debug!(
            scheme = ?loaded.scheme(),
            min_balance = loaded.min_balance,
            max_winners = loaded.max_winners,
            excluded = loaded.excluded_accounts.len(),
            "Loaded distribution config"
        );
        Ok(loaded)
    }
}

/// On-disk shape; account ids are hex strings and an empty common budget
/// account means "legacy".
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawDistributionConfig {
    common_budget_account: Option<String>,
    min_balance: i64,
    max_winners: usize,
    excluded_accounts: AccountList,
}

/// A list in files, a comma-separated string in the environment.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AccountList {
    Joined(String),
    Items(Vec<String>),
}

impl AccountList {
    fn into_items(self) -> Vec<String> {
        match self {
            Self::Joined(joined) => joined.split(',').map(str::to_owned).collect(),
            Self::Items(items) => items,
        }
    }
}

impl Default for RawDistributionConfig {
    fn default() -> Self {
        Self {
            common_budget_account: None,
            min_balance: 0,
            max_winners: INFLATION_NUM_WINNERS,
            excluded_accounts: AccountList::Items(Vec::new()),
        }
    }
}

impl TryFrom<RawDistributionConfig> for DistributionConfig {
    type Error = ConfigError;

    fn try_from(raw: RawDistributionConfig) -> Result<Self, Self::Error> {
        let common_budget_account = match raw.common_budget_account.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(parse_account(s, "common_budget_account")?),
        };

        if raw.min_balance < 0 {
            return Err(ConfigError::Invalid(format!(
                "min_balance must not be negative, got {}",
                raw.min_balance
            )));
        }

        let excluded_accounts = raw
            .excluded_accounts
            .into_items()
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| parse_account(s, "excluded_accounts"))
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Self {
            common_budget_account,
            min_balance: raw.min_balance,
            max_winners: raw.max_winners,
            excluded_accounts,
        })
    }
}

fn parse_account(s: &str, field: &str) -> Result<AccountId, ConfigError> {
    s.parse()
        .map_err(|e| ConfigError::Invalid(format!("{field}: {e}")))
}
