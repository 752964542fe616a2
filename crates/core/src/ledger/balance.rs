//! Running balance bookkeeping.
//!
//! Each balance mutation records the balance before and after the change
//! together with a monotonically increasing account version.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Running balance information for one applied change.
///
/// Invariants:
/// - `current_balance == previous_balance + change`
/// - `previous_balance` of change N equals `current_balance` of change N-1
/// - `account_version` increases by exactly one per change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Account version after this change.
    pub account_version: i64,
    /// Balance before this change.
    pub previous_balance: Decimal,
    /// Balance after this change.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Snapshot of an account that has not changed yet in this chain.
    #[must_use]
    pub const fn opening(account_version: i64, balance: Decimal) -> Self {
        Self {
            account_version,
            previous_balance: balance,
            current_balance: balance,
        }
    }

    /// Running balance for the first change on a fresh account.
    #[must_use]
    pub fn first_entry(balance_change: Decimal) -> Self {
        Self::next_entry(&Self::opening(0, Decimal::ZERO), balance_change)
    }

    /// Running balance following `previous`.
    #[must_use]
    pub fn next_entry(previous: &Self, balance_change: Decimal) -> Self {
        Self {
            account_version: previous.account_version + 1,
            previous_balance: previous.current_balance,
            current_balance: previous.current_balance + balance_change,
        }
    }

    /// The change this entry applied.
    #[must_use]
    pub fn change(&self) -> Decimal {
        self.current_balance - self.previous_balance
    }
}
