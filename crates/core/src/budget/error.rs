//! Budget error types.

use chrono::NaiveDate;
use tally_shared::AppError;
use tally_shared::types::{AccountId, BudgetId, BudgetLineId};
use thiserror::Error;

use super::types::BudgetStatus;
use crate::ledger::LedgerError;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Budget not found.
    #[error("Budget not found: {0}")]
    NotFound(BudgetId),

    /// Budget line not found.
    #[error("Budget line not found: {0}")]
    LineNotFound(BudgetLineId),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// End date before start date.
    #[error("End date {end} cannot be before start date {start}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Budget is approved or active and cannot be modified.
    #[error("Cannot modify a {0} budget")]
    BudgetLocked(BudgetStatus),

    /// Only draft budgets can be deleted.
    #[error("Can only delete draft budgets, budget is {0}")]
    NotDeletable(BudgetStatus),

    /// Budget must have at least one line.
    #[error("Budget must have at least one line item")]
    NoLines,

    /// Invalid status transition.
    #[error("Invalid budget transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: BudgetStatus,
        /// Requested status.
        to: BudgetStatus,
    },

    /// Ledger failure while reading actuals.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl BudgetError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "BUDGET_NOT_FOUND",
            Self::LineNotFound(_) => "BUDGET_LINE_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::BudgetLocked(_) => "BUDGET_LOCKED",
            Self::NotDeletable(_) => "BUDGET_NOT_DELETABLE",
            Self::NoLines => "BUDGET_NO_LINES",
            Self::InvalidTransition { .. } => "INVALID_BUDGET_TRANSITION",
            Self::Ledger(err) => err.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::LineNotFound(_) | Self::AccountNotFound(_) => 404,
            Self::InvalidDateRange { .. } | Self::NegativeAmount => 400,
            Self::BudgetLocked(_)
            | Self::NotDeletable(_)
            | Self::NoLines
            | Self::InvalidTransition { .. } => 422,
            Self::Ledger(err) => err.http_status_code(),
        }
    }
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        Self::from_status(err.http_status_code(), err.to_string())
    }
}
