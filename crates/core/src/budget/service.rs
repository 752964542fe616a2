//! Budget lifecycle and line maintenance.
//!
//! Status machine: DRAFT → SUBMITTED → APPROVED → ACTIVE → CLOSED, with
//! DRAFT → APPROVED allowed directly and SUBMITTED → REJECTED. Lines and the
//! header are frozen while a budget is APPROVED or ACTIVE.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, BudgetId, BudgetLineId};

use super::error::BudgetError;
use super::types::{
    Budget, BudgetLine, BudgetLineInput, BudgetStatus, CreateBudgetInput, UpdateBudgetInput,
};
use crate::ledger::AccountType;

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Creates a DRAFT budget. Each line's type is taken from its account.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` if the end date precedes the start date;
    /// `AccountNotFound` or `NegativeAmount` for an invalid line.
    pub fn create<F>(
        input: CreateBudgetInput,
        today: NaiveDate,
        account_type_of: F,
    ) -> Result<Budget, BudgetError>
    where
        F: Fn(AccountId) -> Option<AccountType>,
    {
        Self::validate_dates(input.start_date, input.end_date)?;

        let id = BudgetId::new();
        let lines = input
            .lines
            .into_iter()
            .map(|line| Self::build_line(id, line, &account_type_of))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Budget {
            id,
            name: input.name,
            description: input.description,
            fiscal_year: input.fiscal_year,
            period: input.period,
            budget_type: input.budget_type,
            status: BudgetStatus::Draft,
            start_date: input.start_date,
            end_date: input.end_date,
            created_date: today,
            approved_date: None,
            approved_by: None,
            notes: input.notes,
            lines,
        })
    }

    /// Replaces the header fields.
    ///
    /// # Errors
    ///
    /// `BudgetLocked` when APPROVED or ACTIVE; `InvalidDateRange`.
    pub fn update(budget: &mut Budget, input: UpdateBudgetInput) -> Result<(), BudgetError> {
        Self::ensure_unlocked(budget)?;
        Self::validate_dates(input.start_date, input.end_date)?;

        budget.name = input.name;
        budget.description = input.description;
        budget.period = input.period;
        budget.budget_type = input.budget_type;
        budget.start_date = input.start_date;
        budget.end_date = input.end_date;
        budget.notes = input.notes;
        Ok(())
    }

    /// Checks that a budget may be deleted.
    ///
    /// # Errors
    ///
    /// `NotDeletable` unless the budget is a draft.
    pub fn ensure_deletable(budget: &Budget) -> Result<(), BudgetError> {
        if budget.status != BudgetStatus::Draft {
            return Err(BudgetError::NotDeletable(budget.status));
        }
        Ok(())
    }

    /// DRAFT → SUBMITTED.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless DRAFT; `NoLines` for an empty budget.
    pub fn submit(budget: &mut Budget) -> Result<(), BudgetError> {
        Self::require_status(budget, &[BudgetStatus::Draft], BudgetStatus::Submitted)?;
        if budget.lines.is_empty() {
            return Err(BudgetError::NoLines);
        }
        budget.status = BudgetStatus::Submitted;
        Ok(())
    }

    /// DRAFT or SUBMITTED → APPROVED, recording who approved and when.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` from any other status.
    pub fn approve(
        budget: &mut Budget,
        approved_by: impl Into<String>,
        today: NaiveDate,
    ) -> Result<(), BudgetError> {
        Self::require_status(
            budget,
            &[BudgetStatus::Draft, BudgetStatus::Submitted],
            BudgetStatus::Approved,
        )?;
        budget.status = BudgetStatus::Approved;
        budget.approved_by = Some(approved_by.into());
        budget.approved_date = Some(today);
        Ok(())
    }

    /// SUBMITTED → REJECTED.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless SUBMITTED.
    pub fn reject(budget: &mut Budget) -> Result<(), BudgetError> {
        Self::transition(budget, BudgetStatus::Submitted, BudgetStatus::Rejected)
    }

    /// APPROVED → ACTIVE.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless APPROVED.
    pub fn activate(budget: &mut Budget) -> Result<(), BudgetError> {
        Self::transition(budget, BudgetStatus::Approved, BudgetStatus::Active)
    }

    /// ACTIVE → CLOSED.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless ACTIVE.
    pub fn close(budget: &mut Budget) -> Result<(), BudgetError> {
        Self::transition(budget, BudgetStatus::Active, BudgetStatus::Closed)
    }

    /// Adds a line; its type mirrors the account's type.
    ///
    /// # Errors
    ///
    /// `BudgetLocked`, `AccountNotFound` (when `account_type` is `None`), or
    /// `NegativeAmount`.
    pub fn add_line(
        budget: &mut Budget,
        input: BudgetLineInput,
        account_type: Option<AccountType>,
    ) -> Result<BudgetLineId, BudgetError> {
        Self::ensure_unlocked(budget)?;
        let line = Self::build_line(budget.id, input, &|_| account_type)?;
        let id = line.id;
        budget.lines.push(line);
        Ok(id)
    }

    /// Changes a line's amount and notes.
    ///
    /// # Errors
    ///
    /// `BudgetLocked`, `LineNotFound`, or `NegativeAmount`.
    pub fn update_line(
        budget: &mut Budget,
        line_id: BudgetLineId,
        amount: Decimal,
        notes: Option<String>,
    ) -> Result<(), BudgetError> {
        Self::ensure_unlocked(budget)?;
        Self::validate_amount(amount)?;
        let line = budget
            .lines
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or(BudgetError::LineNotFound(line_id))?;
        line.amount = amount;
        line.notes = notes;
        Ok(())
    }

    /// Removes a line.
    ///
    /// # Errors
    ///
    /// `BudgetLocked` or `LineNotFound`.
    pub fn delete_line(budget: &mut Budget, line_id: BudgetLineId) -> Result<(), BudgetError> {
        Self::ensure_unlocked(budget)?;
        let before = budget.lines.len();
        budget.lines.retain(|l| l.id != line_id);
        if budget.lines.len() == before {
            return Err(BudgetError::LineNotFound(line_id));
        }
        Ok(())
    }

    fn build_line<F>(
        budget_id: BudgetId,
        input: BudgetLineInput,
        account_type_of: &F,
    ) -> Result<BudgetLine, BudgetError>
    where
        F: Fn(AccountId) -> Option<AccountType>,
    {
        Self::validate_amount(input.amount)?;
        let line_type = account_type_of(input.account_id)
            .ok_or(BudgetError::AccountNotFound(input.account_id))?;
        Ok(BudgetLine {
            id: BudgetLineId::new(),
            budget_id,
            account_id: input.account_id,
            amount: input.amount,
            notes: input.notes,
            line_type,
        })
    }

    fn validate_dates(start: NaiveDate, end: NaiveDate) -> Result<(), BudgetError> {
        if end < start {
            return Err(BudgetError::InvalidDateRange { start, end });
        }
        Ok(())
    }

    fn validate_amount(amount: Decimal) -> Result<(), BudgetError> {
        if amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount);
        }
        Ok(())
    }

    fn ensure_unlocked(budget: &Budget) -> Result<(), BudgetError> {
        if budget.status.is_locked() {
            return Err(BudgetError::BudgetLocked(budget.status));
        }
        Ok(())
    }

    fn require_status(
        budget: &Budget,
        allowed: &[BudgetStatus],
        to: BudgetStatus,
    ) -> Result<(), BudgetError> {
        if allowed.contains(&budget.status) {
            Ok(())
        } else {
            Err(BudgetError::InvalidTransition {
                from: budget.status,
                to,
            })
        }
    }

    fn transition(
        budget: &mut Budget,
        from: BudgetStatus,
        to: BudgetStatus,
    ) -> Result<(), BudgetError> {
        Self::require_status(budget, &[from], to)?;
        budget.status = to;
        Ok(())
    }
}
