//! Business rule validation for journal entries.

use rust_decimal::Decimal;
use tally_shared::types::AccountId;

use super::entry::JournalLine;
use super::error::LedgerError;
use super::types::{JournalLineInput, JournalTotals};

/// Validates the lines of a new journal entry.
///
/// Checks that there is at least one line, that no amount is negative, and
/// that every referenced account exists. Balance is not required until
/// posting.
///
/// # Errors
///
/// Returns the first rule violated.
pub fn validate_line_inputs<F>(
    lines: &[JournalLineInput],
    account_exists: F,
) -> Result<JournalTotals, LedgerError>
where
    F: Fn(AccountId) -> bool,
{
    if lines.is_empty() {
        return Err(LedgerError::NoLines);
    }

    let mut debit = Decimal::ZERO;
    let mut credit = Decimal::ZERO;
    for line in lines {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
        if !account_exists(line.account_id) {
            return Err(LedgerError::AccountNotFound(line.account_id));
        }
        debit += line.debit;
        credit += line.credit;
    }

    Ok(JournalTotals::new(debit, credit))
}

/// Validates that posted lines balance exactly.
///
/// # Errors
///
/// `NoLines` for an empty entry, `UnbalancedJournal` when debits != credits.
pub fn validate_balanced(lines: &[JournalLine]) -> Result<JournalTotals, LedgerError> {
    if lines.is_empty() {
        return Err(LedgerError::NoLines);
    }
    let debit: Decimal = lines.iter().map(|l| l.debit).sum();
    let credit: Decimal = lines.iter().map(|l| l.credit).sum();
    let totals = JournalTotals::new(debit, credit);
    if !totals.is_balanced {
        return Err(LedgerError::UnbalancedJournal { debit, credit });
    }
    Ok(totals)
}

/// Returns true if a line carries both a debit and a credit.
#[must_use]
pub fn is_two_sided(line: &JournalLineInput) -> bool {
    !line.debit.is_zero() && !line.credit.is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_lines_rejected() {
        assert!(matches!(
            validate_line_inputs(&[], |_| true),
            Err(LedgerError::NoLines)
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let lines = vec![JournalLineInput::debit(AccountId::new(), dec!(-1))];
        assert!(matches!(
            validate_line_inputs(&lines, |_| true),
            Err(LedgerError::NegativeAmount)
        ));
    }

    #[test]
    fn test_unknown_account_rejected() {
        let missing = AccountId::new();
        let lines = vec![JournalLineInput::debit(missing, dec!(10))];
        assert!(matches!(
            validate_line_inputs(&lines, |_| false),
            Err(LedgerError::AccountNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn test_unbalanced_draft_is_allowed() {
        let lines = vec![
            JournalLineInput::debit(AccountId::new(), dec!(100)),
            JournalLineInput::credit(AccountId::new(), dec!(40)),
        ];
        let totals = validate_line_inputs(&lines, |_| true).unwrap();
        assert!(!totals.is_balanced);
        assert_eq!(totals.difference(), dec!(60));
    }

    #[test]
    fn test_two_sided_detection() {
        let mut line = JournalLineInput::debit(AccountId::new(), dec!(5));
        assert!(!is_two_sided(&line));
        line.credit = dec!(5);
        assert!(is_two_sided(&line));
    }
}
