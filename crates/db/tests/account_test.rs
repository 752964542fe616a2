//! Chart of accounts tests: hierarchy, deletion guards, and account status.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_core::ledger::{
    Account, AccountStatus, AccountType, CreateJournalInput, JournalLineInput, LedgerError,
    NewAccount,
};
use tally_db::repositories::{AccountRepoError, JournalRepoError};
use tally_db::{AccountRepository, Database, JournalRepository};
use tally_shared::types::AccountId;

struct Fixture {
    accounts: AccountRepository,
    journals: JournalRepository,
    assets: AccountId,
    current: AccountId,
    cash: AccountId,
    revenue: AccountId,
}

/// `1000 Assets` > `1100 Current Assets` > `1110 Cash`, plus `4000 Sales`.
fn setup() -> Fixture {
    let db = Database::new();
    let accounts = AccountRepository::new(db.clone());
    let assets = accounts
        .create_account(NewAccount::new("1000", "Assets", AccountType::Asset))
        .unwrap()
        .id;
    let current = accounts
        .create_account(
            NewAccount::new("1100", "Current Assets", AccountType::Asset).with_parent(assets),
        )
        .unwrap()
        .id;
    let cash = accounts
        .create_account(NewAccount::new("1110", "Cash", AccountType::Asset).with_parent(current))
        .unwrap()
        .id;
    let revenue = accounts
        .create_account(NewAccount::new("4000", "Sales", AccountType::Revenue))
        .unwrap()
        .id;
    Fixture {
        journals: JournalRepository::new(db),
        accounts,
        assets,
        current,
        cash,
        revenue,
    }
}

fn sale(fx: &Fixture, amount: Decimal) -> CreateJournalInput {
    CreateJournalInput {
        date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        period: None,
        description: "Cash sale".to_string(),
        reference: None,
        lines: vec![
            JournalLineInput::debit(fx.cash, amount),
            JournalLineInput::credit(fx.revenue, amount),
        ],
    }
}

fn codes(accounts: &[Account]) -> Vec<&str> {
    accounts.iter().map(|a| a.code.as_str()).collect()
}

#[test]
fn test_ancestors_and_children() {
    let fx = setup();

    assert_eq!(codes(&fx.accounts.ancestors(fx.cash).unwrap()), ["1100", "1000"]);
    assert_eq!(codes(&fx.accounts.children(fx.assets).unwrap()), ["1100"]);
    assert!(fx.accounts.children(fx.cash).unwrap().is_empty());
    assert!(matches!(
        fx.accounts.ancestors(AccountId::new()).unwrap_err(),
        AccountRepoError::Ledger(LedgerError::AccountNotFound(_))
    ));
}

#[rstest]
#[case::itself(0)]
#[case::child(1)]
#[case::grandchild(2)]
fn test_set_parent_rejects_cycles(#[case] depth: usize) {
    let fx = setup();
    let candidate = [fx.assets, fx.current, fx.cash][depth];

    let err = fx.accounts.set_parent(fx.assets, Some(candidate)).unwrap_err();

    assert!(matches!(
        err,
        AccountRepoError::Ledger(LedgerError::AccountHierarchyCycle { account_id, parent_id })
            if account_id == fx.assets && parent_id == candidate
    ));
    assert!(fx.accounts.ancestors(fx.assets).unwrap().is_empty());
    assert_eq!(codes(&fx.accounts.ancestors(fx.cash).unwrap()), ["1100", "1000"]);
}

#[test]
fn test_set_parent_moves_and_clears() {
    let fx = setup();

    fx.accounts.set_parent(fx.cash, Some(fx.assets)).unwrap();
    assert_eq!(codes(&fx.accounts.children(fx.assets).unwrap()), ["1100", "1110"]);
    assert_eq!(
        fx.accounts.find_by_id(fx.cash).unwrap().unwrap().parent_id,
        Some(fx.assets)
    );

    fx.accounts.set_parent(fx.cash, None).unwrap();
    assert!(fx.accounts.ancestors(fx.cash).unwrap().is_empty());
    assert_eq!(fx.accounts.find_by_id(fx.cash).unwrap().unwrap().parent_id, None);
}

#[rstest]
#[case::posted(true)]
#[case::draft(false)]
fn test_delete_referenced_account_is_in_use(#[case] posted: bool) {
    let fx = setup();
    if posted {
        fx.journals.create_and_post(sale(&fx, dec!(40))).unwrap();
    } else {
        fx.journals.create(sale(&fx, dec!(40))).unwrap();
    }

    let err = fx.accounts.delete_account(fx.revenue).unwrap_err();

    assert!(matches!(
        err,
        AccountRepoError::Ledger(LedgerError::AccountInUse(id)) if id == fx.revenue
    ));
    assert!(fx.accounts.find_by_id(fx.revenue).unwrap().is_some());
}

#[test]
fn test_delete_after_draft_removed() {
    let fx = setup();
    let draft = fx.journals.create(sale(&fx, dec!(40))).unwrap();
    fx.journals.delete(draft.id).unwrap();

    fx.accounts.delete_account(fx.revenue).unwrap();

    assert!(fx.accounts.find_by_id(fx.revenue).unwrap().is_none());
    assert!(fx.accounts.find_by_code("4000").unwrap().is_none());
}

#[test]
fn test_delete_parent_with_children_rejected() {
    let fx = setup();

    let err = fx.accounts.delete_account(fx.current).unwrap_err();

    assert!(matches!(
        err,
        AccountRepoError::Ledger(LedgerError::AccountHasChildren(id)) if id == fx.current
    ));
    assert_eq!(codes(&fx.accounts.children(fx.current).unwrap()), ["1110"]);
}

#[test]
fn test_inactive_account_rejects_postings() {
    let fx = setup();
    fx.journals.create_and_post(sale(&fx, dec!(100))).unwrap();

    let retired = fx
        .accounts
        .set_status(fx.revenue, AccountStatus::Inactive)
        .unwrap();
    assert_eq!(retired.status, AccountStatus::Inactive);
    assert_eq!(retired.balance, dec!(100));

    let err = fx.journals.create_and_post(sale(&fx, dec!(25))).unwrap_err();
    assert!(matches!(
        err,
        JournalRepoError::Ledger(LedgerError::AccountInactive(id)) if id == fx.revenue
    ));
    let cash = fx.accounts.find_by_id(fx.cash).unwrap().unwrap();
    assert_eq!(cash.balance, dec!(100));
    assert_eq!(cash.version, 1);
    assert_eq!(fx.journals.list_all().unwrap().len(), 1);

    fx.accounts
        .set_status(fx.revenue, AccountStatus::Active)
        .unwrap();
    fx.journals.create_and_post(sale(&fx, dec!(25))).unwrap();
    assert_eq!(
        fx.accounts.find_by_id(fx.revenue).unwrap().unwrap().balance,
        dec!(125)
    );
}

#[test]
fn test_set_status_unknown_account() {
    let fx = setup();

    assert!(matches!(
        fx.accounts
            .set_status(AccountId::new(), AccountStatus::Inactive)
            .unwrap_err(),
        AccountRepoError::Ledger(LedgerError::AccountNotFound(_))
    ));
}
