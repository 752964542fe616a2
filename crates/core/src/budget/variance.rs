//! Budget vs actual variance.

use rust_decimal::Decimal;
use tally_shared::types::round_half_up;

use super::error::BudgetError;
use super::types::{
    Budget, LineVariance, VarianceReport, VarianceResult, VarianceStatus, VarianceSummary,
};
use crate::aggregation::{AccountMovement, AggregationEngine, DateWindow};
use crate::ledger::{AccountType, ChartOfAccounts, JournalEntry};

/// Scale of the variance ratio before it is scaled to a percentage.
const PERCENT_RATIO_SCALE: u32 = 4;

/// Calculates variance between budgeted and actual amounts.
///
/// `variance = actual - budgeted` for every line type. Revenue lines are
/// favorable above budget, expense lines below; other types are neutral.
#[must_use]
pub fn calculate_variance(
    budgeted: Decimal,
    actual: Decimal,
    line_type: AccountType,
) -> VarianceResult {
    let variance = actual - budgeted;

    let variance_percent = if budgeted.is_zero() {
        Decimal::ZERO
    } else {
        round_half_up(variance / budgeted, PERCENT_RATIO_SCALE) * Decimal::ONE_HUNDRED
    };

    let status = if variance.is_zero() {
        VarianceStatus::OnTarget
    } else {
        match line_type {
            AccountType::Revenue if variance > Decimal::ZERO => VarianceStatus::Favorable,
            AccountType::Expense if variance < Decimal::ZERO => VarianceStatus::Favorable,
            AccountType::Revenue | AccountType::Expense => VarianceStatus::Unfavorable,
            AccountType::Asset | AccountType::Liability | AccountType::Equity => {
                VarianceStatus::Neutral
            }
        }
    };

    VarianceResult {
        budgeted,
        actual,
        variance,
        variance_percent,
        status,
    }
}

/// Actual activity of an account: credit minus debit for revenue, debit
/// minus credit for everything else.
#[must_use]
pub fn actual_amount(movement: Option<&AccountMovement>) -> Decimal {
    movement.map_or(Decimal::ZERO, |m| match m.account_type {
        AccountType::Revenue => m.total_credit - m.total_debit,
        _ => m.total_debit - m.total_credit,
    })
}

/// Compares every budget line to posted activity over the budget's dates.
///
/// Lines whose account no longer exists are left out and listed in
/// `skipped_lines`.
///
/// # Errors
///
/// `InvalidDateRange` if the budget's dates are inverted; a ledger error if
/// a posted line references an unknown account.
pub fn variance_report(
    budget: &Budget,
    chart: &ChartOfAccounts,
    entries: &[JournalEntry],
) -> Result<VarianceReport, BudgetError> {
    let window = DateWindow::new(budget.start_date, budget.end_date).map_err(|_| {
        BudgetError::InvalidDateRange {
            start: budget.start_date,
            end: budget.end_date,
        }
    })?;
    let movements = AggregationEngine::movements(chart, entries, &window.into())?;

    let mut lines = Vec::with_capacity(budget.lines.len());
    let mut skipped_lines = Vec::new();
    let mut summary = VarianceSummary::default();

    for line in &budget.lines {
        let Some(account) = chart.get(line.account_id) else {
            skipped_lines.push(line.id);
            continue;
        };
        let actual = actual_amount(movements.get(&line.account_id));
        let result = calculate_variance(line.amount, actual, line.line_type);

        match line.line_type {
            AccountType::Revenue => {
                summary.total_budget_revenue += line.amount;
                summary.total_actual_revenue += actual;
            }
            AccountType::Expense => {
                summary.total_budget_expense += line.amount;
                summary.total_actual_expense += actual;
            }
            _ => {}
        }

        lines.push(LineVariance {
            line_id: line.id,
            account_id: account.id,
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            line_type: line.line_type,
            result,
        });
    }

    summary.revenue_variance = summary.total_actual_revenue - summary.total_budget_revenue;
    summary.expense_variance = summary.total_actual_expense - summary.total_budget_expense;
    summary.budget_net_income = summary.total_budget_revenue - summary.total_budget_expense;
    summary.actual_net_income = summary.total_actual_revenue - summary.total_actual_expense;
    summary.net_income_variance = summary.actual_net_income - summary.budget_net_income;

    Ok(VarianceReport {
        budget_id: budget.id,
        budget_name: budget.name.clone(),
        period: budget.period,
        start_date: budget.start_date,
        end_date: budget.end_date,
        lines,
        summary,
        skipped_lines,
    })
}
