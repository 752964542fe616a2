//! Journal entry aggregate.

use std::cmp::Ordering;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, JournalEntryId, JournalLineId};

use super::types::{AccountType, CashFlowCategory, JournalStatus, JournalTotals};
use crate::fiscal::PeriodLabel;

/// A single debit/credit line of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Unique identifier.
    pub id: JournalLineId,
    /// Owning journal entry.
    pub journal_id: JournalEntryId,
    /// Target account.
    pub account_id: AccountId,
    /// Debit amount (>= 0).
    pub debit: Decimal,
    /// Credit amount (>= 0).
    pub credit: Decimal,
    /// Optional line description.
    pub description: Option<String>,
    /// Explicit cash flow section.
    pub cash_flow_category: Option<CashFlowCategory>,
}

impl JournalLine {
    /// Debit minus credit, regardless of account type.
    #[must_use]
    pub fn raw_movement(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Normal-balance effect of this line on an account of `account_type`.
    #[must_use]
    pub fn effect(&self, account_type: AccountType) -> Decimal {
        account_type
            .normal_balance()
            .balance_change(self.debit, self.credit)
    }

    /// The line's face amount: the debit if nonzero, otherwise the credit.
    #[must_use]
    pub fn face_amount(&self) -> Decimal {
        if self.debit.is_zero() {
            self.credit
        } else {
            self.debit
        }
    }
}

/// A journal entry with its ordered lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Year-month period label.
    pub period: PeriodLabel,
    /// Lifecycle status.
    pub status: JournalStatus,
    /// Entry description.
    pub description: String,
    /// Optional external reference.
    pub reference: Option<String>,
    /// Store-assigned creation sequence; breaks ties between same-day entries.
    pub sequence: u64,
    /// Lines in the order they were added.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Sum of debits and credits.
    #[must_use]
    pub fn totals(&self) -> JournalTotals {
        let debit: Decimal = self.lines.iter().map(|l| l.debit).sum();
        let credit: Decimal = self.lines.iter().map(|l| l.credit).sum();
        JournalTotals::new(debit, credit)
    }

    /// Returns true once the entry has been posted.
    #[must_use]
    pub fn is_posted(&self) -> bool {
        self.status == JournalStatus::Posted
    }

    /// Returns true if any line targets `account_id`.
    #[must_use]
    pub fn touches(&self, account_id: AccountId) -> bool {
        self.lines.iter().any(|l| l.account_id == account_id)
    }

    /// Finds a line by id.
    #[must_use]
    pub fn line(&self, line_id: JournalLineId) -> Option<&JournalLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    /// Chronological order: date, then creation sequence.
    #[must_use]
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then(self.sequence.cmp(&other.sequence))
    }

    /// Description to show for a line: its own, else the entry's.
    #[must_use]
    pub fn line_description<'a>(&'a self, line: &'a JournalLine) -> &'a str {
        line.description.as_deref().unwrap_or(&self.description)
    }
}
