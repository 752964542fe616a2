//! Tests for budget lifecycle and variance.

use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_shared::types::{AccountId, BudgetLineId};

use super::error::BudgetError;
use super::service::BudgetService;
use super::types::{
    Budget, BudgetLineInput, BudgetPeriod, BudgetStatus, BudgetType, CreateBudgetInput,
    UpdateBudgetInput, VarianceStatus,
};
use super::variance::{calculate_variance, variance_report};
use crate::ledger::{AccountType, JournalLineInput};
use crate::test_fixtures::{Books, date};

fn input(lines: Vec<BudgetLineInput>) -> CreateBudgetInput {
    CreateBudgetInput {
        name: "FY2024 Operating".to_string(),
        description: None,
        fiscal_year: 2024,
        period: BudgetPeriod::Annually,
        budget_type: BudgetType::Operating,
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        notes: None,
        lines,
    }
}

fn draft_with_line() -> Budget {
    let account = AccountId::new();
    BudgetService::create(
        input(vec![BudgetLineInput::new(account, dec!(100))]),
        date(2024, 1, 1),
        |_| Some(AccountType::Expense),
    )
    .unwrap()
}

#[rstest]
#[case(dec!(10000), dec!(12000), AccountType::Revenue, dec!(2000), VarianceStatus::Favorable)]
#[case(dec!(10000), dec!(8000), AccountType::Revenue, dec!(-2000), VarianceStatus::Unfavorable)]
#[case(dec!(5000), dec!(6000), AccountType::Expense, dec!(1000), VarianceStatus::Unfavorable)]
#[case(dec!(5000), dec!(4000), AccountType::Expense, dec!(-1000), VarianceStatus::Favorable)]
#[case(dec!(5000), dec!(5000), AccountType::Expense, dec!(0), VarianceStatus::OnTarget)]
#[case(dec!(800), dec!(900), AccountType::Asset, dec!(100), VarianceStatus::Neutral)]
#[case(dec!(800), dec!(700), AccountType::Liability, dec!(-100), VarianceStatus::Neutral)]
#[case(dec!(800), dec!(800), AccountType::Equity, dec!(0), VarianceStatus::OnTarget)]
fn test_calculate_variance(
    #[case] budgeted: Decimal,
    #[case] actual: Decimal,
    #[case] line_type: AccountType,
    #[case] variance: Decimal,
    #[case] status: VarianceStatus,
) {
    let result = calculate_variance(budgeted, actual, line_type);
    assert_eq!(result.variance, variance);
    assert_eq!(result.status, status);
}

#[test]
fn test_variance_percent_rounds_ratio_to_four_places() {
    let result = calculate_variance(dec!(3), dec!(4), AccountType::Revenue);
    // 1/3 -> 0.3333 -> 33.33
    assert_eq!(result.variance_percent, dec!(33.3300));

    let zero = calculate_variance(Decimal::ZERO, dec!(500), AccountType::Expense);
    assert_eq!(zero.variance_percent, Decimal::ZERO);
}

#[test]
fn test_create_rejects_inverted_dates() {
    let mut bad = input(vec![]);
    bad.end_date = date(2023, 12, 31);
    let result = BudgetService::create(bad, date(2024, 1, 1), |_| None);
    assert!(matches!(result, Err(BudgetError::InvalidDateRange { .. })));
}

#[test]
fn test_create_derives_line_type_and_validates_lines() {
    let budget = draft_with_line();
    assert_eq!(budget.status, BudgetStatus::Draft);
    assert_eq!(budget.lines[0].line_type, AccountType::Expense);
    assert_eq!(budget.lines[0].budget_id, budget.id);

    let missing = BudgetService::create(
        input(vec![BudgetLineInput::new(AccountId::new(), dec!(1))]),
        date(2024, 1, 1),
        |_| None,
    );
    assert!(matches!(missing, Err(BudgetError::AccountNotFound(_))));

    let negative = BudgetService::create(
        input(vec![BudgetLineInput::new(AccountId::new(), dec!(-1))]),
        date(2024, 1, 1),
        |_| Some(AccountType::Revenue),
    );
    assert!(matches!(negative, Err(BudgetError::NegativeAmount)));
}

#[test]
fn test_full_lifecycle() {
    let mut budget = draft_with_line();

    BudgetService::submit(&mut budget).unwrap();
    assert_eq!(budget.status, BudgetStatus::Submitted);

    BudgetService::approve(&mut budget, "controller", date(2024, 1, 5)).unwrap();
    assert_eq!(budget.status, BudgetStatus::Approved);
    assert_eq!(budget.approved_by.as_deref(), Some("controller"));
    assert_eq!(budget.approved_date, Some(date(2024, 1, 5)));

    BudgetService::activate(&mut budget).unwrap();
    assert_eq!(budget.status, BudgetStatus::Active);

    BudgetService::close(&mut budget).unwrap();
    assert_eq!(budget.status, BudgetStatus::Closed);
}

#[test]
fn test_submit_requires_lines() {
    let mut budget = BudgetService::create(input(vec![]), date(2024, 1, 1), |_| None).unwrap();
    assert!(matches!(
        BudgetService::submit(&mut budget),
        Err(BudgetError::NoLines)
    ));
    assert_eq!(budget.status, BudgetStatus::Draft);
}

#[test]
fn test_draft_can_be_approved_directly_but_not_rejected() {
    let mut budget = draft_with_line();
    assert!(matches!(
        BudgetService::reject(&mut budget),
        Err(BudgetError::InvalidTransition { .. })
    ));
    BudgetService::approve(&mut budget, "cfo", date(2024, 2, 1)).unwrap();
    assert!(matches!(
        BudgetService::approve(&mut budget, "cfo", date(2024, 2, 1)),
        Err(BudgetError::InvalidTransition { .. })
    ));
}

#[test]
fn test_submitted_budget_can_be_rejected() {
    let mut budget = draft_with_line();
    BudgetService::submit(&mut budget).unwrap();
    BudgetService::reject(&mut budget).unwrap();
    assert_eq!(budget.status, BudgetStatus::Rejected);
    assert!(matches!(
        BudgetService::activate(&mut budget),
        Err(BudgetError::InvalidTransition { .. })
    ));
}

#[test]
fn test_locked_budget_rejects_edits() {
    let mut budget = draft_with_line();
    let line_id = budget.lines[0].id;
    BudgetService::approve(&mut budget, "cfo", date(2024, 2, 1)).unwrap();

    let add = BudgetService::add_line(
        &mut budget,
        BudgetLineInput::new(AccountId::new(), dec!(5)),
        Some(AccountType::Expense),
    );
    assert!(matches!(add, Err(BudgetError::BudgetLocked(BudgetStatus::Approved))));
    assert!(matches!(
        BudgetService::update_line(&mut budget, line_id, dec!(1), None),
        Err(BudgetError::BudgetLocked(_))
    ));
    assert!(matches!(
        BudgetService::delete_line(&mut budget, line_id),
        Err(BudgetError::BudgetLocked(_))
    ));
    let header = UpdateBudgetInput {
        name: "renamed".to_string(),
        description: None,
        period: BudgetPeriod::Quarterly,
        budget_type: BudgetType::Master,
        start_date: date(2024, 1, 1),
        end_date: date(2024, 3, 31),
        notes: None,
    };
    assert!(matches!(
        BudgetService::update(&mut budget, header),
        Err(BudgetError::BudgetLocked(_))
    ));
    assert!(matches!(
        BudgetService::ensure_deletable(&budget),
        Err(BudgetError::NotDeletable(BudgetStatus::Approved))
    ));
    assert_eq!(budget.lines.len(), 1);
}

#[test]
fn test_line_maintenance_on_draft() {
    let mut budget = draft_with_line();
    let added = BudgetService::add_line(
        &mut budget,
        BudgetLineInput::new(AccountId::new(), dec!(250)),
        Some(AccountType::Revenue),
    )
    .unwrap();
    assert_eq!(budget.line(added).unwrap().line_type, AccountType::Revenue);

    BudgetService::update_line(&mut budget, added, dec!(300), Some("revised".to_string())).unwrap();
    assert_eq!(budget.line(added).unwrap().amount, dec!(300));

    BudgetService::delete_line(&mut budget, added).unwrap();
    assert!(budget.line(added).is_none());
    assert!(matches!(
        BudgetService::delete_line(&mut budget, BudgetLineId::new()),
        Err(BudgetError::LineNotFound(_))
    ));
}

#[test]
fn test_variance_report_scenario() {
    let mut books = Books::new();
    let cash = books.account("1000", "Cash", AccountType::Asset);
    let sales = books.account("4000", "Sales Revenue", AccountType::Revenue);
    let wages = books.account("5100", "Wages", AccountType::Expense);
    books.post(
        date(2024, 3, 10),
        "Sales",
        vec![
            JournalLineInput::debit(cash, dec!(12000)),
            JournalLineInput::credit(sales, dec!(12000)),
        ],
    );
    books.post(
        date(2024, 3, 20),
        "Payroll",
        vec![
            JournalLineInput::debit(wages, dec!(6000)),
            JournalLineInput::credit(cash, dec!(6000)),
        ],
    );
    // Outside the budget window.
    books.post(
        date(2025, 1, 2),
        "Sales",
        vec![
            JournalLineInput::debit(cash, dec!(99)),
            JournalLineInput::credit(sales, dec!(99)),
        ],
    );

    let chart = &books.chart;
    let budget = BudgetService::create(
        input(vec![
            BudgetLineInput::new(sales, dec!(10000)),
            BudgetLineInput::new(wages, dec!(5000)),
        ]),
        date(2024, 1, 1),
        |id| chart.account_type_of(id),
    )
    .unwrap();

    let report = variance_report(&budget, &books.chart, &books.entries).unwrap();

    let revenue = &report.lines[0];
    assert_eq!(revenue.result.actual, dec!(12000));
    assert_eq!(revenue.result.variance, dec!(2000));
    assert_eq!(revenue.result.variance_percent, dec!(20.0000));
    assert_eq!(revenue.result.status, VarianceStatus::Favorable);

    let expense = &report.lines[1];
    assert_eq!(expense.result.actual, dec!(6000));
    assert_eq!(expense.result.variance, dec!(1000));
    assert_eq!(expense.result.status, VarianceStatus::Unfavorable);

    assert_eq!(report.summary.budget_net_income, dec!(5000));
    assert_eq!(report.summary.actual_net_income, dec!(6000));
    assert_eq!(report.summary.net_income_variance, dec!(1000));
    assert!(report.skipped_lines.is_empty());
}

#[test]
fn test_variance_report_skips_missing_accounts() {
    let mut books = Books::new();
    let gone = books.account("5900", "Temporary", AccountType::Expense);
    let chart = &books.chart;
    let budget = BudgetService::create(
        input(vec![BudgetLineInput::new(gone, dec!(10))]),
        date(2024, 1, 1),
        |id| chart.account_type_of(id),
    )
    .unwrap();
    books.chart.remove(gone).unwrap();

    let report = variance_report(&budget, &books.chart, &books.entries).unwrap();

    assert!(report.lines.is_empty());
    assert_eq!(report.skipped_lines, vec![budget.lines[0].id]);
}

proptest! {
    /// Variance is always actual minus budget, and zero variance is on target.
    #[test]
    fn prop_variance_sign(
        budgeted in 0i64..1_000_000_000,
        actual in 0i64..1_000_000_000,
        revenue in any::<bool>(),
    ) {
        let budgeted = Decimal::from(budgeted);
        let actual = Decimal::from(actual);
        let line_type = if revenue { AccountType::Revenue } else { AccountType::Expense };

        let result = calculate_variance(budgeted, actual, line_type);

        prop_assert_eq!(result.variance, actual - budgeted);
        let expected = match (result.variance.cmp(&Decimal::ZERO), revenue) {
            (std::cmp::Ordering::Equal, _) => VarianceStatus::OnTarget,
            (std::cmp::Ordering::Greater, true) | (std::cmp::Ordering::Less, false) => {
                VarianceStatus::Favorable
            }
            _ => VarianceStatus::Unfavorable,
        };
        prop_assert_eq!(result.status, expected);
    }
}
