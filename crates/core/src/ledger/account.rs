//! Chart of accounts entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::AccountId;

use super::types::{AccountStatus, AccountType};

/// An account in the chart of accounts.
///
/// `balance` is the cumulative normal-balance effect of every posted line
/// touching this account; only the posting engine mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Unique account code (e.g. "1000").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Optional sub-type (e.g. "CURRENT_ASSET").
    pub sub_type: Option<String>,
    /// Parent account in the hierarchy.
    pub parent_id: Option<AccountId>,
    /// Running balance under the account type's sign convention.
    pub balance: Decimal,
    /// Whether the account is active.
    pub status: AccountStatus,
    /// Incremented on every balance mutation.
    pub version: i64,
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Unique account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Optional sub-type.
    pub sub_type: Option<String>,
    /// Optional parent account.
    pub parent_id: Option<AccountId>,
}

impl NewAccount {
    /// Creates input for a top-level account without a sub-type.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            account_type,
            sub_type: None,
            parent_id: None,
        }
    }

    /// Sets the sub-type.
    #[must_use]
    pub fn with_sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.sub_type = Some(sub_type.into());
        self
    }

    /// Sets the parent account.
    #[must_use]
    pub fn with_parent(mut self, parent_id: AccountId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}
