//! Journal construction.

use tally_shared::types::{AccountId, JournalEntryId, JournalLineId};

use super::entry::{JournalEntry, JournalLine};
use super::error::LedgerError;
use super::types::{CreateJournalInput, JournalStatus};
use super::validation::validate_line_inputs;
use crate::fiscal::PeriodLabel;

/// Builds journal entries from validated input.
pub struct JournalService;

impl JournalService {
    /// Validates `input` and materializes a DRAFT entry.
    ///
    /// The period label defaults to the month of the entry date. `sequence`
    /// is the store's creation counter.
    ///
    /// # Errors
    ///
    /// `NoLines`, `NegativeAmount`, `AccountNotFound`, or
    /// `InvalidPeriodLabel` when no period is given and the date's year has
    /// no four-digit label.
    pub fn build_entry<F>(
        input: CreateJournalInput,
        sequence: u64,
        account_exists: F,
    ) -> Result<JournalEntry, LedgerError>
    where
        F: Fn(AccountId) -> bool,
    {
        validate_line_inputs(&input.lines, account_exists)?;
        let period = match input.period {
            Some(period) => period,
            None => PeriodLabel::from_date(input.date)?,
        };

        let id = JournalEntryId::new();
        let lines = input
            .lines
            .into_iter()
            .map(|l| JournalLine {
                id: JournalLineId::new(),
                journal_id: id,
                account_id: l.account_id,
                debit: l.debit,
                credit: l.credit,
                description: l.description,
                cash_flow_category: l.cash_flow_category,
            })
            .collect();

        Ok(JournalEntry {
            id,
            date: input.date,
            period,
            status: JournalStatus::Draft,
            description: input.description,
            reference: input.reference,
            sequence,
            lines,
        })
    }
}
