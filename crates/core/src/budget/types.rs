//! Budget data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, BudgetId, BudgetLineId};

use crate::ledger::AccountType;

/// Budget granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetPeriod {
    /// One month.
    Monthly,
    /// One quarter.
    Quarterly,
    /// One year.
    Annually,
}

/// Budget type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetType {
    /// Operating budget.
    Operating,
    /// Capital expenditure budget.
    Capital,
    /// Cash flow budget.
    CashFlow,
    /// Master budget.
    Master,
}

/// Budget lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetStatus {
    /// Being prepared.
    Draft,
    /// Awaiting approval.
    Submitted,
    /// Approved, lines frozen.
    Approved,
    /// Sent back.
    Rejected,
    /// In force, lines frozen.
    Active,
    /// Finished.
    Closed,
}

impl BudgetStatus {
    /// Returns the status as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Active => "ACTIVE",
            Self::Closed => "CLOSED",
        }
    }

    /// Approved and active budgets cannot be edited.
    #[must_use]
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Approved | Self::Active)
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A budget with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Budget name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Granularity.
    pub period: BudgetPeriod,
    /// Budget type.
    pub budget_type: BudgetType,
    /// Lifecycle status.
    pub status: BudgetStatus,
    /// First day covered.
    pub start_date: NaiveDate,
    /// Last day covered.
    pub end_date: NaiveDate,
    /// Creation date.
    pub created_date: NaiveDate,
    /// Approval date.
    pub approved_date: Option<NaiveDate>,
    /// Approver.
    pub approved_by: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Budget lines.
    pub lines: Vec<BudgetLine>,
}

impl Budget {
    /// Finds a line by id.
    #[must_use]
    pub fn line(&self, line_id: BudgetLineId) -> Option<&BudgetLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }
}

/// A budget line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
    /// Budget line ID.
    pub id: BudgetLineId,
    /// Parent budget ID.
    pub budget_id: BudgetId,
    /// Account ID.
    pub account_id: AccountId,
    /// Budgeted amount.
    pub amount: Decimal,
    /// Optional notes.
    pub notes: Option<String>,
    /// Mirrors the account's type when the line was added.
    pub line_type: AccountType,
}

/// Input for creating a new budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Budget name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Granularity.
    pub period: BudgetPeriod,
    /// Budget type.
    pub budget_type: BudgetType,
    /// First day covered.
    pub start_date: NaiveDate,
    /// Last day covered.
    pub end_date: NaiveDate,
    /// Notes.
    pub notes: Option<String>,
    /// Initial lines.
    pub lines: Vec<BudgetLineInput>,
}

/// Input for updating a budget header.
#[derive(Debug, Clone)]
pub struct UpdateBudgetInput {
    /// Budget name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Granularity.
    pub period: BudgetPeriod,
    /// Budget type.
    pub budget_type: BudgetType,
    /// First day covered.
    pub start_date: NaiveDate,
    /// Last day covered.
    pub end_date: NaiveDate,
    /// Notes.
    pub notes: Option<String>,
}

/// Input for a budget line.
#[derive(Debug, Clone)]
pub struct BudgetLineInput {
    /// Account ID.
    pub account_id: AccountId,
    /// Budgeted amount.
    pub amount: Decimal,
    /// Optional notes.
    pub notes: Option<String>,
}

impl BudgetLineInput {
    /// Line without notes.
    #[must_use]
    pub fn new(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            amount,
            notes: None,
        }
    }
}

/// Variance status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VarianceStatus {
    /// More revenue or less expense than budgeted.
    Favorable,
    /// Less revenue or more expense than budgeted.
    Unfavorable,
    /// Actual equals budget.
    OnTarget,
    /// Balance sheet line; no favorability.
    Neutral,
}

/// Variance calculation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceResult {
    /// Budgeted amount.
    pub budgeted: Decimal,
    /// Actual amount.
    pub actual: Decimal,
    /// Actual minus budgeted.
    pub variance: Decimal,
    /// Variance as a percentage of the budget.
    pub variance_percent: Decimal,
    /// Variance status.
    pub status: VarianceStatus,
}

/// Budget line with its actual amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineVariance {
    /// Budget line ID.
    pub line_id: BudgetLineId,
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Line type.
    pub line_type: AccountType,
    /// Variance figures.
    #[serde(flatten)]
    pub result: VarianceResult,
}

/// Budget vs actual summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceSummary {
    /// Budgeted revenue.
    pub total_budget_revenue: Decimal,
    /// Actual revenue.
    pub total_actual_revenue: Decimal,
    /// Actual minus budgeted revenue.
    pub revenue_variance: Decimal,
    /// Budgeted expense.
    pub total_budget_expense: Decimal,
    /// Actual expense.
    pub total_actual_expense: Decimal,
    /// Actual minus budgeted expense.
    pub expense_variance: Decimal,
    /// Budgeted revenue minus expense.
    pub budget_net_income: Decimal,
    /// Actual revenue minus expense.
    pub actual_net_income: Decimal,
    /// Actual minus budgeted net income.
    pub net_income_variance: Decimal,
}

/// Budget vs actual report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceReport {
    /// Budget ID.
    pub budget_id: BudgetId,
    /// Budget name.
    pub budget_name: String,
    /// Granularity.
    pub period: BudgetPeriod,
    /// First day covered.
    pub start_date: NaiveDate,
    /// Last day covered.
    pub end_date: NaiveDate,
    /// Per-line variance.
    pub lines: Vec<LineVariance>,
    /// Totals.
    pub summary: VarianceSummary,
    /// Lines whose account no longer exists.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_lines: Vec<BudgetLineId>,
}
