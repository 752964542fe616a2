//! Posting engine: applies journal lines to account balances.
//!
//! Posting validates the whole entry before touching any balance, so a
//! rejected entry leaves the chart exactly as it was. Callers still run a
//! post inside one unit of work so that no reader observes a half-applied
//! entry.

use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, JournalEntryId, JournalLineId};

use super::balance::RunningBalance;
use super::chart::ChartOfAccounts;
use super::entry::{JournalEntry, JournalLine};
use super::error::LedgerError;
use super::types::{AccountStatus, JournalTotals};
use super::validation::validate_balanced;
use super::workflow::JournalWorkflow;

/// Balance change produced by one posted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedLine {
    /// The line applied.
    pub line_id: JournalLineId,
    /// The account it touched.
    pub account_id: AccountId,
    /// Balance before and after.
    pub balance: RunningBalance,
}

/// Outcome of posting a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingResult {
    /// The posted entry.
    pub journal_id: JournalEntryId,
    /// Entry totals (always balanced).
    pub totals: JournalTotals,
    /// Per-line balance changes, in line order.
    pub lines: Vec<PostedLine>,
}

/// Stateless posting engine.
pub struct PostingEngine;

impl PostingEngine {
    /// Applies one line's normal-balance effect to its account.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if the target account does not exist.
    pub fn apply_line(
        chart: &mut ChartOfAccounts,
        line: &JournalLine,
    ) -> Result<RunningBalance, LedgerError> {
        let account_type = chart.require(line.account_id)?.account_type;
        chart.apply_change(line.account_id, line.effect(account_type))
    }

    /// Posts an entry awaiting approval: checks the transition, exact
    /// balance, and that every account exists and is active, then applies
    /// each line in order and marks the entry POSTED.
    ///
    /// # Errors
    ///
    /// `InvalidTransition`, `UnbalancedJournal`, `AccountNotFound`, or
    /// `AccountInactive`; in each case neither the chart nor the entry is
    /// modified.
    pub fn post(
        chart: &mut ChartOfAccounts,
        entry: &mut JournalEntry,
    ) -> Result<PostingResult, LedgerError> {
        let next = JournalWorkflow::post(entry.status)?;
        let totals = validate_balanced(&entry.lines)?;
        if let Some(line) = entry.lines.iter().find(|l| !chart.contains(l.account_id)) {
            return Err(LedgerError::AccountNotFound(line.account_id));
        }
        for line in &entry.lines {
            if chart.require(line.account_id)?.status == AccountStatus::Inactive {
                return Err(LedgerError::AccountInactive(line.account_id));
            }
        }

        let mut posted = Vec::with_capacity(entry.lines.len());
        for line in &entry.lines {
            let balance = Self::apply_line(chart, line)?;
            posted.push(PostedLine {
                line_id: line.id,
                account_id: line.account_id,
                balance,
            });
        }
        entry.status = next;

        Ok(PostingResult {
            journal_id: entry.id,
            totals,
            lines: posted,
        })
    }
}
