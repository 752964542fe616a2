//! Property-based tests for the posting engine.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::account::NewAccount;
use super::chart::ChartOfAccounts;
use super::posting::PostingEngine;
use super::service::JournalService;
use super::types::{
    AccountStatus, AccountType, CreateJournalInput, JournalLineInput, JournalStatus,
};
use super::workflow::JournalWorkflow;
use super::{JournalEntry, LedgerError};

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn account_type() -> impl Strategy<Value = AccountType> {
    prop_oneof![
        Just(AccountType::Asset),
        Just(AccountType::Liability),
        Just(AccountType::Equity),
        Just(AccountType::Revenue),
        Just(AccountType::Expense),
    ]
}

fn draft(
    chart: &ChartOfAccounts,
    lines: Vec<JournalLineInput>,
    sequence: u64,
) -> JournalEntry {
    let input = CreateJournalInput {
        date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        period: None,
        description: "generated".to_string(),
        reference: None,
        lines,
    };
    let mut entry = JournalService::build_entry(input, sequence, |id| chart.contains(id)).unwrap();
    entry.status = JournalWorkflow::submit(entry.status).unwrap();
    entry
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Stored balances equal the sum of posted line effects.
    #[test]
    fn prop_stored_balance_matches_posted_effects(
        debit_type in account_type(),
        credit_type in account_type(),
        amounts in prop::collection::vec(positive_amount(), 1..10),
    ) {
        let mut chart = ChartOfAccounts::new();
        let dr = chart.insert(NewAccount::new("1000", "Debit side", debit_type)).unwrap();
        let cr = chart.insert(NewAccount::new("2000", "Credit side", credit_type)).unwrap();

        let mut posted = Vec::new();
        for (seq, amount) in amounts.iter().enumerate() {
            let mut entry = draft(
                &chart,
                vec![
                    JournalLineInput::debit(dr.id, *amount),
                    JournalLineInput::credit(cr.id, *amount),
                ],
                seq as u64,
            );
            PostingEngine::post(&mut chart, &mut entry).unwrap();
            posted.push(entry);
        }

        for account in [&dr, &cr] {
            let expected: Decimal = posted
                .iter()
                .flat_map(|e| e.lines.iter())
                .filter(|l| l.account_id == account.id)
                .map(|l| l.effect(account.account_type))
                .sum();
            let stored = chart.get(account.id).unwrap();
            prop_assert_eq!(stored.balance, expected);
            prop_assert_eq!(stored.version, amounts.len() as i64);
        }
    }

    /// A rejected post leaves balances, versions, and status untouched.
    #[test]
    fn prop_rejected_post_has_no_effect(debit in positive_amount(), credit in positive_amount()) {
        prop_assume!(debit != credit);
        let mut chart = ChartOfAccounts::new();
        let cash = chart.insert(NewAccount::new("1000", "Cash", AccountType::Asset)).unwrap();
        let sales = chart.insert(NewAccount::new("4000", "Sales", AccountType::Revenue)).unwrap();

        let mut entry = draft(
            &chart,
            vec![
                JournalLineInput::debit(cash.id, debit),
                JournalLineInput::credit(sales.id, credit),
            ],
            1,
        );
        let result = PostingEngine::post(&mut chart, &mut entry);

        prop_assert!(
            matches!(result, Err(LedgerError::UnbalancedJournal { .. })),
            "expected UnbalancedJournal"
        );
        prop_assert_eq!(entry.status, JournalStatus::Approval);
        for id in [cash.id, sales.id] {
            let account = chart.get(id).unwrap();
            prop_assert_eq!(account.balance, Decimal::ZERO);
            prop_assert_eq!(account.version, 0);
        }
    }
}

#[test]
fn test_post_with_removed_account_is_rejected_without_mutation() {
    let mut chart = ChartOfAccounts::new();
    let cash = chart.insert(NewAccount::new("1000", "Cash", AccountType::Asset)).unwrap();
    let temp = chart.insert(NewAccount::new("3999", "Temp", AccountType::Equity)).unwrap();
    let mut entry = draft(
        &chart,
        vec![
            JournalLineInput::debit(cash.id, Decimal::new(1000, 0)),
            JournalLineInput::credit(temp.id, Decimal::new(1000, 0)),
        ],
        1,
    );
    chart.remove(temp.id).unwrap();

    let result = PostingEngine::post(&mut chart, &mut entry);

    assert!(matches!(result, Err(LedgerError::AccountNotFound(id)) if id == temp.id));
    assert_eq!(chart.get(cash.id).unwrap().balance, Decimal::ZERO);
    assert_eq!(entry.status, JournalStatus::Approval);
}

#[test]
fn test_post_from_draft_is_invalid_transition() {
    let mut chart = ChartOfAccounts::new();
    let cash = chart.insert(NewAccount::new("1000", "Cash", AccountType::Asset)).unwrap();
    let equity = chart.insert(NewAccount::new("3000", "Capital", AccountType::Equity)).unwrap();
    let mut entry = draft(
        &chart,
        vec![
            JournalLineInput::debit(cash.id, Decimal::ONE),
            JournalLineInput::credit(equity.id, Decimal::ONE),
        ],
        1,
    );
    entry.status = JournalStatus::Draft;

    let result = PostingEngine::post(&mut chart, &mut entry);
    assert!(matches!(result, Err(LedgerError::InvalidTransition { .. })));
}

#[test]
fn test_post_to_inactive_account_is_rejected_without_mutation() {
    let mut chart = ChartOfAccounts::new();
    let cash = chart.insert(NewAccount::new("1000", "Cash", AccountType::Asset)).unwrap();
    let old = chart.insert(NewAccount::new("4900", "Old sales", AccountType::Revenue)).unwrap();
    let mut entry = draft(
        &chart,
        vec![
            JournalLineInput::debit(cash.id, Decimal::new(75, 0)),
            JournalLineInput::credit(old.id, Decimal::new(75, 0)),
        ],
        1,
    );
    chart.set_status(old.id, AccountStatus::Inactive).unwrap();

    let result = PostingEngine::post(&mut chart, &mut entry);

    assert!(matches!(result, Err(LedgerError::AccountInactive(id)) if id == old.id));
    assert_eq!(chart.get(cash.id).unwrap().balance, Decimal::ZERO);
    assert_eq!(chart.get(cash.id).unwrap().version, 0);
    assert_eq!(entry.status, JournalStatus::Approval);

    chart.set_status(old.id, AccountStatus::Active).unwrap();
    PostingEngine::post(&mut chart, &mut entry).unwrap();
    assert_eq!(chart.get(old.id).unwrap().balance, Decimal::new(75, 0));
}
