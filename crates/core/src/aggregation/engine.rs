//! Per-account net movement.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::AccountId;

use super::window::EntrySelection;
use crate::ledger::{AccountType, ChartOfAccounts, JournalEntry, LedgerError};

/// Movement of one account over a selection of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMovement {
    /// Account.
    pub account_id: AccountId,
    /// Account type used for the sign convention.
    pub account_type: AccountType,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Normal-balance net movement.
    pub net: Decimal,
}

impl AccountMovement {
    fn empty(account_id: AccountId, account_type: AccountType) -> Self {
        Self {
            account_id,
            account_type,
            total_debit: Decimal::ZERO,
            total_credit: Decimal::ZERO,
            net: Decimal::ZERO,
        }
    }
}

/// Movements keyed by account.
pub type MovementMap = BTreeMap<AccountId, AccountMovement>;

/// Stateless aggregation engine.
pub struct AggregationEngine;

impl AggregationEngine {
    /// Posted entries inside `selection`, in chronological order.
    pub fn select<'a, I>(entries: I, selection: &EntrySelection) -> Vec<&'a JournalEntry>
    where
        I: IntoIterator<Item = &'a JournalEntry>,
    {
        let mut selected: Vec<&JournalEntry> = entries
            .into_iter()
            .filter(|e| selection.matches(e))
            .collect();
        selected.sort_by(|a, b| a.chronological_cmp(b));
        selected
    }

    /// Folds the lines of `entries` into per-account movement using the
    /// normal-balance sign convention.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if a line references an account `account_type_of`
    /// cannot resolve.
    pub fn aggregate<'a, I, F>(entries: I, account_type_of: F) -> Result<MovementMap, LedgerError>
    where
        I: IntoIterator<Item = &'a JournalEntry>,
        F: Fn(AccountId) -> Option<AccountType>,
    {
        let mut movements = MovementMap::new();
        for line in entries.into_iter().flat_map(|e| e.lines.iter()) {
            let account_type = account_type_of(line.account_id)
                .ok_or(LedgerError::AccountNotFound(line.account_id))?;
            let movement = movements
                .entry(line.account_id)
                .or_insert_with(|| AccountMovement::empty(line.account_id, account_type));
            movement.total_debit += line.debit;
            movement.total_credit += line.credit;
            movement.net += line.effect(account_type);
        }
        Ok(movements)
    }

    /// Selects entries and aggregates them against the chart.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` as for [`Self::aggregate`].
    pub fn movements(
        chart: &ChartOfAccounts,
        entries: &[JournalEntry],
        selection: &EntrySelection,
    ) -> Result<MovementMap, LedgerError> {
        let selected = Self::select(entries, selection);
        Self::aggregate(selected, |id| chart.account_type_of(id))
    }

    /// Net movement of one account, zero if it had no activity.
    #[must_use]
    pub fn net_of(movements: &MovementMap, account_id: AccountId) -> Decimal {
        movements
            .get(&account_id)
            .map_or(Decimal::ZERO, |m| m.net)
    }
}
