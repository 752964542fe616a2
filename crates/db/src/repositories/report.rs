//! Report repository: runs report generators over a consistent snapshot.
//!
//! Every report recomputes from posted journal entries; nothing is cached.

use chrono::NaiveDate;
use tally_core::aggregation::EntrySelection;
use tally_core::fiscal::PeriodLabel;
use tally_core::reports::{
    AccountLedgerReport, BalanceSheetReport, CashFlowReport, IncomeStatementReport,
    PeriodSummary, ReportError, ReportService, TrialBalanceReport,
};
use tally_shared::types::AccountId;
use tally_shared::{AppError, LedgerConfig};
use tracing::debug;

use crate::store::{Database, DbError};

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportRepoError {
    /// Report could not be generated.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<ReportRepoError> for AppError {
    fn from(err: ReportRepoError) -> Self {
        match err {
            ReportRepoError::Report(e) => e.into(),
            ReportRepoError::Database(e) => e.into(),
        }
    }
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: Database,
    config: LedgerConfig,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: Database, config: LedgerConfig) -> Self {
        Self { db, config }
    }

    /// Trial balance as of a date.
    ///
    /// # Errors
    ///
    /// Returns an error if a posted line references an unknown account.
    pub fn trial_balance(&self, as_of: NaiveDate) -> Result<TrialBalanceReport, ReportRepoError> {
        debug!(%as_of, "Generating trial balance");
        Ok(self
            .db
            .read(|t| ReportService::trial_balance(t.chart(), t.journals(), as_of))??)
    }

    /// Income statement for `[start, end]`.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` when `start > end`.
    pub fn income_statement(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<IncomeStatementReport, ReportRepoError> {
        debug!(%start, %end, "Generating income statement");
        Ok(self
            .db
            .read(|t| ReportService::income_statement(t.chart(), t.journals(), start, end))??)
    }

    /// Balance sheet as of a date.
    ///
    /// # Errors
    ///
    /// Returns an error if a posted line references an unknown account.
    pub fn balance_sheet(&self, as_of: NaiveDate) -> Result<BalanceSheetReport, ReportRepoError> {
        debug!(%as_of, "Generating balance sheet");
        Ok(self
            .db
            .read(|t| ReportService::balance_sheet(t.chart(), t.journals(), as_of))??)
    }

    /// Cash flow statement for `[start, end]`.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` when `start > end`.
    pub fn cash_flow(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CashFlowReport, ReportRepoError> {
        debug!(%start, %end, "Generating cash flow statement");
        Ok(self.db.read(|t| {
            ReportService::cash_flow(t.chart(), t.journals(), start, end, &self.config)
        })??)
    }

    /// Posted activity on one account for `[start, end]`.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` or `InvalidDateRange`.
    pub fn account_ledger(
        &self,
        account_id: AccountId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AccountLedgerReport, ReportRepoError> {
        debug!(%account_id, %start, %end, "Generating account ledger");
        Ok(self.db.read(|t| {
            ReportService::account_ledger(t.chart(), t.journals(), account_id, start, end)
        })??)
    }

    /// Movement totals by account type for one period label.
    ///
    /// # Errors
    ///
    /// Returns an error if a posted line references an unknown account.
    pub fn period_summary(&self, period: &PeriodLabel) -> Result<PeriodSummary, ReportRepoError> {
        debug!(%period, "Generating period summary");
        let selection = EntrySelection::Period(period.clone());
        Ok(self
            .db
            .read(|t| ReportService::period_summary(t.chart(), t.journals(), &selection))??)
    }
}
