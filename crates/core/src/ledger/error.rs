//! Ledger error types for validation and state errors.
//!
//! This module defines all errors that can occur during ledger operations,
//! including validation errors, chart of accounts errors, journal state
//! errors, and concurrency errors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::AppError;
use tally_shared::types::{AccountId, JournalEntryId, JournalLineId};
use thiserror::Error;

use super::types::JournalStatus;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Journal entry must have at least one line.
    #[error("Journal entry must have at least one line")]
    NoLines,

    /// Journal entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedJournal {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative")]
    NegativeAmount,

    /// Period label is not of the form `YYYY-MM`.
    #[error("Invalid period label: {0}")]
    InvalidPeriodLabel(String),

    /// Date range start is after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// No account carries the given code.
    #[error("Account code not found: {0}")]
    AccountCodeNotFound(String),

    /// Account code is already in use.
    #[error("Account code already exists: {0}")]
    DuplicateAccountCode(String),

    /// Assigning this parent would make the account its own ancestor.
    #[error("Assigning parent {parent_id} to account {account_id} would create a cycle")]
    AccountHierarchyCycle {
        /// The account being re-parented.
        account_id: AccountId,
        /// The proposed parent.
        parent_id: AccountId,
    },

    /// Account still has child accounts.
    #[error("Account {0} has child accounts")]
    AccountHasChildren(AccountId),

    /// Account is referenced by journal lines and cannot be deleted.
    #[error("Account {0} is referenced by journal lines")]
    AccountInUse(AccountId),

    // ========== Journal State Errors ==========
    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    JournalNotFound(JournalEntryId),

    /// Journal line not found.
    #[error("Journal line not found: {0}")]
    JournalLineNotFound(JournalLineId),

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: JournalStatus,
        /// The attempted target status.
        to: JournalStatus,
    },

    /// Cannot modify or delete a posted journal entry.
    #[error("Cannot modify posted journal entry")]
    CannotModifyPosted,

    /// Account is inactive and accepts no new postings.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoLines => "NO_LINES",
            Self::UnbalancedJournal { .. } => "UNBALANCED_JOURNAL",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::InvalidPeriodLabel(_) => "INVALID_PERIOD_LABEL",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountCodeNotFound(_) => "ACCOUNT_CODE_NOT_FOUND",
            Self::DuplicateAccountCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::AccountHierarchyCycle { .. } => "ACCOUNT_HIERARCHY_CYCLE",
            Self::AccountHasChildren(_) => "ACCOUNT_HAS_CHILDREN",
            Self::AccountInUse(_) => "ACCOUNT_IN_USE",
            Self::JournalNotFound(_) => "JOURNAL_NOT_FOUND",
            Self::JournalLineNotFound(_) => "JOURNAL_LINE_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::CannotModifyPosted => "CANNOT_MODIFY_POSTED",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::NoLines
            | Self::UnbalancedJournal { .. }
            | Self::NegativeAmount
            | Self::InvalidPeriodLabel(_)
            | Self::InvalidDateRange { .. }
            | Self::DuplicateAccountCode(_)
            | Self::AccountHierarchyCycle { .. } => 400,

            // 404 Not Found
            Self::AccountNotFound(_)
            | Self::AccountCodeNotFound(_)
            | Self::JournalNotFound(_)
            | Self::JournalLineNotFound(_) => 404,

            // 422 - state errors
            Self::AccountHasChildren(_)
            | Self::AccountInUse(_)
            | Self::AccountInactive(_)
            | Self::InvalidTransition { .. }
            | Self::CannotModifyPosted => 422,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::from_status(err.http_status_code(), err.to_string())
    }
}
