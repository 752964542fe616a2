//! Property-based tests for journal validation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, JournalEntryId, JournalLineId};

use super::entry::JournalLine;
use super::error::LedgerError;
use super::types::JournalLineInput;
use super::validation::{validate_balanced, validate_line_inputs};

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a negative amount.
fn negative_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

fn line(debit: Decimal, credit: Decimal) -> JournalLine {
    JournalLine {
        id: JournalLineId::new(),
        journal_id: JournalEntryId::new(),
        account_id: AccountId::new(),
        debit,
        credit,
        description: None,
        cash_flow_category: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Debits split across several lines balance one credit of the sum.
    #[test]
    fn prop_split_debits_balance(amounts in prop::collection::vec(positive_amount(), 1..8)) {
        let total: Decimal = amounts.iter().copied().sum();
        let mut lines: Vec<JournalLine> =
            amounts.iter().map(|a| line(*a, Decimal::ZERO)).collect();
        lines.push(line(Decimal::ZERO, total));

        let totals = validate_balanced(&lines).unwrap();
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.debit, total);
        prop_assert_eq!(totals.credit, total);
    }

    /// Any nonzero difference is rejected, however small.
    #[test]
    fn prop_unbalanced_rejected(amount in positive_amount(), drift in 1i64..1000i64) {
        let credit = amount + Decimal::new(drift, 4);
        let lines = vec![line(amount, Decimal::ZERO), line(Decimal::ZERO, credit)];

        let result = validate_balanced(&lines);
        prop_assert!(
            matches!(result, Err(LedgerError::UnbalancedJournal { .. })),
            "expected UnbalancedJournal"
        );
    }

    /// Negative debits or credits never pass input validation.
    #[test]
    fn prop_negative_amount_rejected(
        negative in negative_amount(),
        positive in positive_amount(),
        on_debit in any::<bool>(),
    ) {
        let account = AccountId::new();
        let bad = if on_debit {
            JournalLineInput::debit(account, negative)
        } else {
            JournalLineInput::credit(account, negative)
        };
        let lines = vec![bad, JournalLineInput::credit(account, positive)];

        let result = validate_line_inputs(&lines, |_| true);
        prop_assert!(matches!(result, Err(LedgerError::NegativeAmount)));
    }

    /// Drafts may be unbalanced; input validation only reports the totals.
    #[test]
    fn prop_unbalanced_draft_inputs_accepted(
        debit in positive_amount(),
        credit in positive_amount(),
    ) {
        let account = AccountId::new();
        let lines = vec![
            JournalLineInput::debit(account, debit),
            JournalLineInput::credit(account, credit),
        ];

        let totals = validate_line_inputs(&lines, |_| true).unwrap();
        prop_assert_eq!(totals.is_balanced, debit == credit);
    }
}
