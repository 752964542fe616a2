//! Budget repository for budget lifecycle and variance operations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_core::budget::{
    Budget, BudgetError, BudgetLineInput, BudgetService, BudgetStatus, CreateBudgetInput,
    UpdateBudgetInput, VarianceReport, variance_report,
};
use tally_shared::AppError;
use tally_shared::types::{BudgetId, BudgetLineId};
use tracing::{info, warn};

use crate::store::{Database, DbError, Tables};

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetRepoError {
    /// Budget rule violated.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<BudgetRepoError> for AppError {
    fn from(err: BudgetRepoError) -> Self {
        match err {
            BudgetRepoError::Budget(e) => e.into(),
            BudgetRepoError::Database(e) => e.into(),
        }
    }
}

/// Budget repository.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: Database,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Creates a DRAFT budget with its initial lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the dates are inverted, a line amount is
    /// negative, or a line references an unknown account.
    pub fn create_budget(
        &self,
        input: CreateBudgetInput,
        today: NaiveDate,
    ) -> Result<Budget, BudgetRepoError> {
        let budget = self.db.transaction(|t| {
            let chart = t.chart();
            let budget = BudgetService::create(input, today, |id| chart.account_type_of(id))?;
            t.budgets_mut().insert(budget.id, budget.clone());
            Ok::<_, BudgetRepoError>(budget)
        })?;
        info!(
            budget_id = %budget.id,
            name = %budget.name,
            lines = budget.lines.len(),
            "Budget created"
        );
        Ok(budget)
    }

    /// Finds a budget by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn find_by_id(&self, id: BudgetId) -> Result<Option<Budget>, BudgetRepoError> {
        Ok(self.db.read(|t| t.budgets().get(&id).cloned())?)
    }

    /// Lists budgets, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn list_budgets(
        &self,
        status: Option<BudgetStatus>,
    ) -> Result<Vec<Budget>, BudgetRepoError> {
        Ok(self.db.read(|t| {
            t.budgets()
                .values()
                .filter(|b| status.is_none_or(|s| b.status == s))
                .cloned()
                .collect()
        })?)
    }

    /// Budgets of a fiscal year, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn find_by_fiscal_year(
        &self,
        fiscal_year: i32,
        status: Option<BudgetStatus>,
    ) -> Result<Vec<Budget>, BudgetRepoError> {
        Ok(self.db.read(|t| {
            t.budgets()
                .values()
                .filter(|b| b.fiscal_year == fiscal_year)
                .filter(|b| status.is_none_or(|s| b.status == s))
                .cloned()
                .collect()
        })?)
    }

    /// Budgets whose date range covers `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn find_covering(&self, date: NaiveDate) -> Result<Vec<Budget>, BudgetRepoError> {
        Ok(self.db.read(|t| {
            t.budgets()
                .values()
                .filter(|b| b.start_date <= date && date <= b.end_date)
                .cloned()
                .collect()
        })?)
    }

    /// Replaces a budget's header fields.
    ///
    /// # Errors
    ///
    /// `BudgetLocked` when APPROVED or ACTIVE.
    pub fn update_budget(
        &self,
        id: BudgetId,
        input: UpdateBudgetInput,
    ) -> Result<Budget, BudgetRepoError> {
        self.mutate(id, "updated", |b, _| BudgetService::update(b, input))
    }

    /// Deletes a DRAFT budget.
    ///
    /// # Errors
    ///
    /// `NotDeletable` for any other status.
    pub fn delete_budget(&self, id: BudgetId) -> Result<(), BudgetRepoError> {
        self.db.transaction(|t| {
            let budget = t.budgets().get(&id).ok_or(BudgetError::NotFound(id))?;
            BudgetService::ensure_deletable(budget)?;
            t.budgets_mut().remove(&id);
            Ok::<_, BudgetRepoError>(())
        })?;
        info!(budget_id = %id, "Budget deleted");
        Ok(())
    }

    /// DRAFT → SUBMITTED.
    ///
    /// # Errors
    ///
    /// Returns an error for any other status or a budget without lines.
    pub fn submit(&self, id: BudgetId) -> Result<Budget, BudgetRepoError> {
        self.mutate(id, "submitted", |b, _| BudgetService::submit(b))
    }

    /// DRAFT or SUBMITTED → APPROVED.
    ///
    /// # Errors
    ///
    /// Returns an error for any other status.
    pub fn approve(
        &self,
        id: BudgetId,
        approved_by: &str,
        today: NaiveDate,
    ) -> Result<Budget, BudgetRepoError> {
        self.mutate(id, "approved", |b, _| BudgetService::approve(b, approved_by, today))
    }

    /// SUBMITTED → REJECTED.
    ///
    /// # Errors
    ///
    /// Returns an error for any other status.
    pub fn reject(&self, id: BudgetId) -> Result<Budget, BudgetRepoError> {
        self.mutate(id, "rejected", |b, _| BudgetService::reject(b))
    }

    /// APPROVED → ACTIVE.
    ///
    /// # Errors
    ///
    /// Returns an error for any other status.
    pub fn activate(&self, id: BudgetId) -> Result<Budget, BudgetRepoError> {
        self.mutate(id, "activated", |b, _| BudgetService::activate(b))
    }

    /// ACTIVE → CLOSED.
    ///
    /// # Errors
    ///
    /// Returns an error for any other status.
    pub fn close(&self, id: BudgetId) -> Result<Budget, BudgetRepoError> {
        self.mutate(id, "closed", |b, _| BudgetService::close(b))
    }

    /// Adds a line; its type is taken from the account.
    ///
    /// # Errors
    ///
    /// `BudgetLocked`, `NegativeAmount`, or `AccountNotFound`.
    pub fn add_line(
        &self,
        id: BudgetId,
        input: BudgetLineInput,
    ) -> Result<BudgetLineId, BudgetRepoError> {
        let mut line_id = None;
        self.mutate(id, "line added", |b, t| {
            let account_type = t.chart().account_type_of(input.account_id);
            line_id = Some(BudgetService::add_line(b, input, account_type)?);
            Ok(())
        })?;
        line_id.ok_or_else(|| BudgetError::NotFound(id).into())
    }

    /// Changes a line's amount and notes.
    ///
    /// # Errors
    ///
    /// `BudgetLocked`, `LineNotFound`, or `NegativeAmount`.
    pub fn update_line(
        &self,
        id: BudgetId,
        line_id: BudgetLineId,
        amount: Decimal,
        notes: Option<String>,
    ) -> Result<Budget, BudgetRepoError> {
        self.mutate(id, "line updated", |b, _| {
            BudgetService::update_line(b, line_id, amount, notes)
        })
    }

    /// Removes a line.
    ///
    /// # Errors
    ///
    /// `BudgetLocked` or `LineNotFound`.
    pub fn delete_line(
        &self,
        id: BudgetId,
        line_id: BudgetLineId,
    ) -> Result<Budget, BudgetRepoError> {
        self.mutate(id, "line deleted", |b, _| BudgetService::delete_line(b, line_id))
    }

    /// Budget against actual posted activity over the budget's dates.
    ///
    /// # Errors
    ///
    /// `NotFound` if the budget does not exist.
    pub fn variance_report(&self, id: BudgetId) -> Result<VarianceReport, BudgetRepoError> {
        let report = self.db.read(|t| {
            let budget = t.budgets().get(&id).ok_or(BudgetError::NotFound(id))?;
            variance_report(budget, t.chart(), t.journals())
        })??;
        for line_id in &report.skipped_lines {
            warn!(
                budget_id = %id,
                budget_line_id = %line_id,
                "Budget line account no longer exists, skipped"
            );
        }
        Ok(report)
    }

    fn mutate<F>(&self, id: BudgetId, action: &str, f: F) -> Result<Budget, BudgetRepoError>
    where
        F: FnOnce(&mut Budget, &Tables) -> Result<(), BudgetError>,
    {
        let budget = self.db.transaction(|t| {
            let mut budget = t
                .budgets()
                .get(&id)
                .cloned()
                .ok_or(BudgetError::NotFound(id))?;
            f(&mut budget, t)?;
            t.budgets_mut().insert(id, budget.clone());
            Ok::<_, BudgetRepoError>(budget)
        })?;
        info!(budget_id = %id, status = %budget.status, "Budget {action}");
        Ok(budget)
    }
}
