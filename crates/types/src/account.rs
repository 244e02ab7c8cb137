use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when parsing an account identifier string.
#[derive(Debug, thiserror::Error)]
pub enum AccountIdError {
    #[error("account id must be {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("account id is not valid hexadecimal")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Number of raw bytes in an account identifier.
pub const ACCOUNT_ID_BYTES: usize = 32;
/// Length of the hex encoding of an account identifier.
pub const ACCOUNT_ID_HEX_LENGTH: usize = ACCOUNT_ID_BYTES * 2;

/// 32-byte account identifier (public key bytes).
///
/// Serialised as lowercase hex in JSON and configuration files. Ordering is
/// byte-lexicographic, which the vote tally uses as its tie-break.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(pub [u8; ACCOUNT_ID_BYTES]);

impl AccountId {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != ACCOUNT_ID_HEX_LENGTH {
            return Err(AccountIdError::InvalidLength {
                expected: ACCOUNT_ID_HEX_LENGTH,
                actual: s.len(),
            });
        }
        let mut bytes = [0u8; ACCOUNT_ID_BYTES];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.to_hex()
    }
}

impl From<[u8; ACCOUNT_ID_BYTES]> for AccountId {
    fn from(value: [u8; ACCOUNT_ID_BYTES]) -> Self {
        Self(value)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form keeps log lines readable.
        write!(f, "AccountId({}..)", &self.to_hex()[..8])
    }
}

/// Minimal account record: identity, balance and the account it votes for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    pub account_id: AccountId,
    pub balance: i64,
    #[serde(default)]
    pub inflation_dest: Option<AccountId>,
}

impl AccountEntry {
    pub fn new(account_id: AccountId, balance: i64) -> Self {
        Self {
            account_id,
            balance,
            inflation_dest: None,
        }
    }

    /// Builder-style helper to point this account's votes at `dest`.
    pub fn voting_for(mut self, dest: AccountId) -> Self {
        self.inflation_dest = Some(dest);
        self
    }
}
