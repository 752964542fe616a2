//! Budget lifecycle and variance tests.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_core::budget::{
    BudgetError, BudgetLineInput, BudgetPeriod, BudgetStatus, BudgetType, CreateBudgetInput,
    VarianceStatus,
};
use tally_core::ledger::{AccountType, CreateJournalInput, JournalLineInput, NewAccount};
use tally_db::repositories::BudgetRepoError;
use tally_db::{AccountRepository, BudgetRepository, Database, JournalRepository};
use tally_shared::types::AccountId;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Fixture {
    budgets: BudgetRepository,
    journals: JournalRepository,
    cash: AccountId,
    revenue: AccountId,
    expense: AccountId,
}

fn setup() -> Fixture {
    let db = Database::new();
    let accounts = AccountRepository::new(db.clone());
    let open = |code: &str, name: &str, account_type| {
        accounts
            .create_account(NewAccount::new(code, name, account_type))
            .unwrap()
            .id
    };
    Fixture {
        cash: open("1000", "Cash and Bank", AccountType::Asset),
        revenue: open("4000", "Sales Revenue", AccountType::Revenue),
        expense: open("5000", "Operating Expenses", AccountType::Expense),
        budgets: BudgetRepository::new(db.clone()),
        journals: JournalRepository::new(db),
    }
}

fn annual(fx: &Fixture) -> CreateBudgetInput {
    CreateBudgetInput {
        name: "FY2024 Operating".to_string(),
        description: None,
        fiscal_year: 2024,
        period: BudgetPeriod::Annually,
        budget_type: BudgetType::Operating,
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        notes: None,
        lines: vec![
            BudgetLineInput::new(fx.revenue, dec!(10000)),
            BudgetLineInput::new(fx.expense, dec!(5000)),
        ],
    }
}

fn post(fx: &Fixture, on: NaiveDate, debit: AccountId, credit: AccountId, amount: Decimal) {
    fx.journals
        .create_and_post(CreateJournalInput {
            date: on,
            period: None,
            description: "Activity".to_string(),
            reference: None,
            lines: vec![
                JournalLineInput::debit(debit, amount),
                JournalLineInput::credit(credit, amount),
            ],
        })
        .unwrap();
}

#[test]
fn test_variance_against_posted_activity() {
    let fx = setup();
    post(&fx, date(2024, 3, 1), fx.cash, fx.revenue, dec!(12000));
    post(&fx, date(2024, 4, 1), fx.expense, fx.cash, dec!(6000));
    // Outside the budget window.
    post(&fx, date(2025, 1, 2), fx.cash, fx.revenue, dec!(999));

    let budget = fx.budgets.create_budget(annual(&fx), date(2023, 12, 1)).unwrap();
    let report = fx.budgets.variance_report(budget.id).unwrap();

    let revenue = &report.lines[0].result;
    assert_eq!(revenue.actual, dec!(12000));
    assert_eq!(revenue.variance, dec!(2000));
    assert_eq!(revenue.status, VarianceStatus::Favorable);

    let expense = &report.lines[1].result;
    assert_eq!(expense.actual, dec!(6000));
    assert_eq!(expense.variance, dec!(1000));
    assert_eq!(expense.status, VarianceStatus::Unfavorable);

    assert_eq!(report.summary.budget_net_income, dec!(5000));
    assert_eq!(report.summary.actual_net_income, dec!(6000));
    assert!(report.skipped_lines.is_empty());
}

#[test]
fn test_approval_flow_locks_lines() {
    let fx = setup();
    let budget = fx.budgets.create_budget(annual(&fx), date(2023, 12, 1)).unwrap();
    assert_eq!(budget.status, BudgetStatus::Draft);

    fx.budgets.submit(budget.id).unwrap();
    let approved = fx
        .budgets
        .approve(budget.id, "controller", date(2023, 12, 5))
        .unwrap();
    assert_eq!(approved.approved_by.as_deref(), Some("controller"));
    assert_eq!(approved.approved_date, Some(date(2023, 12, 5)));

    let active = fx.budgets.activate(budget.id).unwrap();
    assert_eq!(active.status, BudgetStatus::Active);

    let err = fx
        .budgets
        .add_line(budget.id, BudgetLineInput::new(fx.cash, dec!(1)))
        .unwrap_err();
    assert!(matches!(
        err,
        BudgetRepoError::Budget(BudgetError::BudgetLocked(BudgetStatus::Active))
    ));
}

#[test]
fn test_draft_lines_editable() {
    let fx = setup();
    let budget = fx.budgets.create_budget(annual(&fx), date(2023, 12, 1)).unwrap();

    let line_id = fx
        .budgets
        .add_line(budget.id, BudgetLineInput::new(fx.cash, dec!(250)))
        .unwrap();
    let updated = fx
        .budgets
        .update_line(budget.id, line_id, dec!(300), Some("Float".to_string()))
        .unwrap();
    assert_eq!(updated.lines.len(), 3);
    assert_eq!(updated.line(line_id).unwrap().amount, dec!(300));

    let trimmed = fx.budgets.delete_line(budget.id, line_id).unwrap();
    assert_eq!(trimmed.lines.len(), 2);
}

#[test]
fn test_create_rejects_inverted_dates() {
    let fx = setup();
    let mut input = annual(&fx);
    input.end_date = date(2023, 6, 30);

    let err = fx.budgets.create_budget(input, date(2023, 12, 1)).unwrap_err();
    assert!(matches!(
        err,
        BudgetRepoError::Budget(BudgetError::InvalidDateRange { .. })
    ));
    assert!(fx.budgets.list_budgets(None).unwrap().is_empty());
}

#[test]
fn test_find_by_fiscal_year_and_covering_date() {
    let fx = setup();
    let current = fx.budgets.create_budget(annual(&fx), date(2023, 12, 1)).unwrap();
    let mut next_input = annual(&fx);
    next_input.name = "FY2025 Operating".to_string();
    next_input.fiscal_year = 2025;
    next_input.start_date = date(2025, 1, 1);
    next_input.end_date = date(2025, 12, 31);
    let next = fx.budgets.create_budget(next_input, date(2024, 11, 1)).unwrap();
    fx.budgets.submit(next.id).unwrap();

    let fy2024 = fx.budgets.find_by_fiscal_year(2024, None).unwrap();
    assert_eq!(fy2024.len(), 1);
    assert_eq!(fy2024[0].id, current.id);

    let submitted = fx
        .budgets
        .find_by_fiscal_year(2025, Some(BudgetStatus::Submitted))
        .unwrap();
    assert_eq!(submitted.len(), 1);
    assert!(
        fx.budgets
            .find_by_fiscal_year(2025, Some(BudgetStatus::Draft))
            .unwrap()
            .is_empty()
    );

    let covering = fx.budgets.find_covering(date(2025, 6, 30)).unwrap();
    assert_eq!(covering.len(), 1);
    assert_eq!(covering[0].id, next.id);
    assert!(fx.budgets.find_covering(date(2026, 1, 1)).unwrap().is_empty());
}
