//! Ledger domain types for journal creation and posting.
//!
//! This module defines the core enums of the double-entry model and the
//! inputs used to create journal entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tally_shared::types::AccountId;

use crate::fiscal::PeriodLabel;

/// Classification of an account in the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Resources owned (debit-normal).
    Asset,
    /// Obligations owed (credit-normal).
    Liability,
    /// Owner's residual interest (credit-normal).
    Equity,
    /// Income earned (credit-normal).
    Revenue,
    /// Costs incurred (debit-normal).
    Expense,
}

impl AccountType {
    /// All account types, in statement order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];

    /// Returns the side on which this account type conventionally increases.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "ASSET",
            Self::Liability => "LIABILITY",
            Self::Equity => "EQUITY",
            Self::Revenue => "REVENUE",
            Self::Expense => "EXPENSE",
        }
    }

    /// Parses an account type from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ASSET" => Some(Self::Asset),
            "LIABILITY" => Some(Self::Liability),
            "EQUITY" => Some(Self::Equity),
            "REVENUE" => Some(Self::Revenue),
            "EXPENSE" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normal-balance polarity of an account.
///
/// - Debit-normal (Asset, Expense): effect = debit - credit
/// - Credit-normal (Liability, Equity, Revenue): effect = credit - debit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NormalBalance {
    /// Balance increases with debits.
    Debit,
    /// Balance increases with credits.
    Credit,
}

impl NormalBalance {
    /// Calculates the signed balance effect of a debit/credit pair.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Whether an account accepts new postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    /// Account is in use.
    #[default]
    Active,
    /// Account is retired; its history still reports.
    Inactive,
}

/// Journal entry status.
///
/// Valid transitions:
/// - Draft → Approval (submit for approval)
/// - Approval → Posted (post)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JournalStatus {
    /// Being prepared; freely deletable.
    Draft,
    /// Awaiting posting.
    Approval,
    /// Applied to account balances (immutable).
    Posted,
}

impl JournalStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Approval => "APPROVAL",
            Self::Posted => "POSTED",
        }
    }

    /// Parses a status from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Some(Self::Draft),
            "APPROVAL" => Some(Self::Approval),
            "POSTED" => Some(Self::Posted),
            _ => None,
        }
    }

    /// Returns true if the entry can no longer change.
    #[must_use]
    pub const fn is_immutable(self) -> bool {
        matches!(self, Self::Posted)
    }
}

impl fmt::Display for JournalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cash flow statement section for a journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashFlowCategory {
    /// Day-to-day trading.
    Operating,
    /// Purchase and sale of long-lived assets.
    Investing,
    /// Funding from owners and lenders.
    Financing,
}

impl CashFlowCategory {
    /// Best-effort categorization of an untagged line from its description.
    ///
    /// "sales", "revenue", "expense" map to operating; "asset", "investment",
    /// "equipment" map to investing; anything else is financing.
    #[must_use]
    pub fn from_description(description: &str) -> Self {
        let desc = description.to_lowercase();
        if ["sales", "revenue", "expense"].iter().any(|k| desc.contains(k)) {
            Self::Operating
        } else if ["asset", "investment", "equipment"]
            .iter()
            .any(|k| desc.contains(k))
        {
            Self::Investing
        } else {
            Self::Financing
        }
    }
}

/// Input for a single journal line.
#[derive(Debug, Clone)]
pub struct JournalLineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Debit amount (>= 0).
    pub debit: Decimal,
    /// Credit amount (>= 0).
    pub credit: Decimal,
    /// Optional line description.
    pub description: Option<String>,
    /// Explicit cash flow section, if known when the entry is created.
    pub cash_flow_category: Option<CashFlowCategory>,
}

impl JournalLineInput {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
            cash_flow_category: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
            cash_flow_category: None,
        }
    }

    /// Sets the line description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Tags the line with a cash flow section.
    #[must_use]
    pub fn with_category(mut self, category: CashFlowCategory) -> Self {
        self.cash_flow_category = Some(category);
        self
    }
}

/// Input for creating a new journal entry.
#[derive(Debug, Clone)]
pub struct CreateJournalInput {
    /// Transaction date.
    pub date: NaiveDate,
    /// Period label; derived from `date` when absent.
    pub period: Option<PeriodLabel>,
    /// Entry description.
    pub description: String,
    /// Optional external reference (invoice number, asset code).
    pub reference: Option<String>,
    /// Lines, applied in this order when posted.
    pub lines: Vec<JournalLineInput>,
}

/// Journal totals for validation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalTotals {
    /// Sum of debits.
    pub debit: Decimal,
    /// Sum of credits.
    pub credit: Decimal,
    /// Whether debits equal credits exactly.
    pub is_balanced: bool,
}

impl JournalTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debit: Decimal, credit: Decimal) -> Self {
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }

    /// Returns debits minus credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}
