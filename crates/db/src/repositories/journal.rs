//! Journal repository: entry lifecycle and finders.

use chrono::NaiveDate;
use serde::Serialize;
use tally_core::aggregation::{AggregationEngine, DateWindow, EntrySelection};
use tally_core::fiscal::PeriodLabel;
use tally_core::ledger::{
    CreateJournalInput, JournalEntry, JournalService, JournalStatus, JournalWorkflow,
    LedgerError, PostingEngine, PostingResult, is_two_sided,
};
use tally_shared::AppError;
use tally_shared::types::{AccountId, JournalEntryId};
use tracing::{debug, info, warn};

use crate::store::{Database, DbError, Tables};

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalRepoError {
    /// Ledger rule violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<JournalRepoError> for AppError {
    fn from(err: JournalRepoError) -> Self {
        match err {
            JournalRepoError::Ledger(e) => e.into(),
            JournalRepoError::Database(e) => e.into(),
        }
    }
}

/// A journal entry together with the balance changes its posting made.
#[derive(Debug, Clone, Serialize)]
pub struct PostedJournal {
    /// The posted entry.
    pub entry: JournalEntry,
    /// Per-line balance changes.
    pub posting: PostingResult,
}

/// Builds a DRAFT entry and stores it.
pub(crate) fn create_in(
    tables: &mut Tables,
    input: CreateJournalInput,
) -> Result<JournalEntry, LedgerError> {
    for line in input.lines.iter().filter(|l| is_two_sided(l)) {
        warn!(
            account_id = %line.account_id,
            debit = %line.debit,
            credit = %line.credit,
            "Journal line carries both a debit and a credit"
        );
    }
    let sequence = tables.next_journal_sequence();
    let chart = tables.chart();
    let entry = JournalService::build_entry(input, sequence, |id| chart.contains(id))?;
    tables.push_journal(entry.clone());
    Ok(entry)
}

/// Posts a stored entry that is awaiting approval.
pub(crate) fn post_in(
    tables: &mut Tables,
    id: JournalEntryId,
) -> Result<PostedJournal, LedgerError> {
    let (chart, entry) = tables
        .posting_target(id)
        .ok_or(LedgerError::JournalNotFound(id))?;
    let posting = PostingEngine::post(chart, entry)?;
    for line in &posting.lines {
        debug!(
            journal_id = %id,
            account_id = %line.account_id,
            previous_balance = %line.balance.previous_balance,
            current_balance = %line.balance.current_balance,
            "Account balance updated"
        );
    }
    Ok(PostedJournal {
        entry: entry.clone(),
        posting,
    })
}

/// Creates, approves and posts a system-generated entry in one step.
pub(crate) fn create_and_post_in(
    tables: &mut Tables,
    input: CreateJournalInput,
) -> Result<PostedJournal, LedgerError> {
    let id = create_in(tables, input)?.id;
    let entry = tables
        .journal_mut(id)
        .ok_or(LedgerError::JournalNotFound(id))?;
    entry.status = JournalWorkflow::submit(entry.status)?;
    let posted = post_in(tables, id)?;
    info!(
        journal_id = %id,
        description = %posted.entry.description,
        total = %posted.posting.totals.debit,
        "Journal entry posted"
    );
    Ok(posted)
}

/// Journal repository for entry lifecycle operations.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: Database,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Creates a DRAFT entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry has no lines, a negative amount, or
    /// references an unknown account.
    pub fn create(&self, input: CreateJournalInput) -> Result<JournalEntry, JournalRepoError> {
        let entry = self.db.transaction(|t| create_in(t, input).map_err(JournalRepoError::from))?;
        info!(journal_id = %entry.id, period = %entry.period, "Journal entry created");
        Ok(entry)
    }

    /// Moves a DRAFT entry to APPROVAL.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing or not a draft.
    pub fn submit_for_approval(
        &self,
        id: JournalEntryId,
    ) -> Result<JournalEntry, JournalRepoError> {
        let entry = self.db.transaction(|t| {
            let entry = t.journal_mut(id).ok_or(LedgerError::JournalNotFound(id))?;
            entry.status = JournalWorkflow::submit(entry.status)?;
            Ok::<_, JournalRepoError>(entry.clone())
        })?;
        info!(journal_id = %id, "Journal entry submitted for approval");
        Ok(entry)
    }

    /// Posts an entry awaiting approval, applying every line atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing, not awaiting approval,
    /// unbalanced, or references an unknown account. Nothing is applied on
    /// error.
    pub fn post(&self, id: JournalEntryId) -> Result<PostedJournal, JournalRepoError> {
        let posted = self
            .db
            .transaction(|t| post_in(t, id).map_err(JournalRepoError::from))
            .inspect_err(|e| warn!(journal_id = %id, error = %e, "Journal posting rejected"))?;
        info!(journal_id = %id, total = %posted.posting.totals.debit, "Journal entry posted");
        Ok(posted)
    }

    /// Creates and posts a system entry in one unit of work.
    ///
    /// # Errors
    ///
    /// As for [`Self::create`] and [`Self::post`].
    pub fn create_and_post(
        &self,
        input: CreateJournalInput,
    ) -> Result<PostedJournal, JournalRepoError> {
        self.db
            .transaction(|t| create_and_post_in(t, input).map_err(JournalRepoError::from))
    }

    /// Deletes a DRAFT or APPROVAL entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing or already posted.
    pub fn delete(&self, id: JournalEntryId) -> Result<(), JournalRepoError> {
        self.db.transaction(|t| {
            let entry = t.journal(id).ok_or(LedgerError::JournalNotFound(id))?;
            JournalWorkflow::ensure_deletable(entry.status)?;
            t.remove_journal(id);
            Ok::<_, JournalRepoError>(())
        })?;
        info!(journal_id = %id, "Journal entry deleted");
        Ok(())
    }

    /// Finds an entry by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn find_by_id(&self, id: JournalEntryId) -> Result<Option<JournalEntry>, JournalRepoError> {
        Ok(self.db.read(|t| t.journal(id).cloned())?)
    }

    /// All entries in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn list_all(&self) -> Result<Vec<JournalEntry>, JournalRepoError> {
        Ok(self.db.read(|t| t.journals().to_vec())?)
    }

    /// Entries with the given status.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn find_by_status(
        &self,
        status: JournalStatus,
    ) -> Result<Vec<JournalEntry>, JournalRepoError> {
        self.filtered(|j| j.status == status)
    }

    /// Entries of a period label with the given status.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn find_by_period_and_status(
        &self,
        period: &PeriodLabel,
        status: JournalStatus,
    ) -> Result<Vec<JournalEntry>, JournalRepoError> {
        self.filtered(|j| &j.period == period && j.status == status)
    }

    /// Entries dated within `[start, end]` with the given status.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` when `start > end`.
    pub fn find_by_date_range_and_status(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        status: JournalStatus,
    ) -> Result<Vec<JournalEntry>, JournalRepoError> {
        let window = DateWindow::new(start, end)?;
        self.filtered(|j| window.contains(j.date) && j.status == status)
    }

    /// Entries with at least one line on `account_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn find_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<JournalEntry>, JournalRepoError> {
        self.filtered(|j| j.touches(account_id))
    }

    /// Posted entries matching a period or date selection, chronologically.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn find_posted(
        &self,
        selection: &EntrySelection,
    ) -> Result<Vec<JournalEntry>, JournalRepoError> {
        Ok(self.db.read(|t| {
            AggregationEngine::select(t.journals(), selection)
                .into_iter()
                .cloned()
                .collect()
        })?)
    }

    fn filtered<F>(&self, keep: F) -> Result<Vec<JournalEntry>, JournalRepoError>
    where
        F: Fn(&JournalEntry) -> bool,
    {
        Ok(self
            .db
            .read(|t| t.journals().iter().filter(|j| keep(j)).cloned().collect())?)
    }
}
