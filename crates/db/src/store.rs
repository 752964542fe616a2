//! In-memory store with serialized units of work.
//!
//! A unit of work holds the write lock for its whole lifetime and mutates
//! the tables in place. Every mutable accessor on [`Tables`] records how to
//! undo its change: the first mutable borrow of a table saves a copy of that
//! table, and journals log row-level changes instead. `commit` discards the
//! undo log; dropping the transaction without committing replays it. Readers
//! never observe a half-applied workflow.

use std::collections::{BTreeMap, HashMap};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use tally_core::assets::FixedAsset;
use tally_core::budget::Budget;
use tally_core::invoicing::{ApInvoice, ArInvoice};
use tally_core::ledger::{ChartOfAccounts, JournalEntry};
use tally_core::reconciliation::ReconItem;
use tally_shared::AppError;
use tally_shared::types::{BudgetId, FixedAssetId, InvoiceId, JournalEntryId, ReconItemId};

/// Store failures.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A writer panicked while holding the lock.
    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        Self::Database(err.to_string())
    }
}

/// Journal entries in creation order, indexed by ID.
#[derive(Debug, Default)]
struct JournalTable {
    rows: Vec<JournalEntry>,
    index: HashMap<JournalEntryId, usize>,
}

impl JournalTable {
    fn reindex_from(&mut self, start: usize) {
        for (idx, row) in self.rows.iter().enumerate().skip(start) {
            self.index.insert(row.id, idx);
        }
    }
}

#[derive(Debug)]
enum JournalUndo {
    Pushed,
    Changed(usize, JournalEntry),
    Removed(usize, JournalEntry),
}

#[derive(Debug, Default)]
struct UndoLog {
    chart: Option<ChartOfAccounts>,
    budgets: Option<BTreeMap<BudgetId, Budget>>,
    fixed_assets: Option<BTreeMap<FixedAssetId, FixedAsset>>,
    recon_items: Option<BTreeMap<ReconItemId, ReconItem>>,
    ap_invoices: Option<BTreeMap<InvoiceId, ApInvoice>>,
    ar_invoices: Option<BTreeMap<InvoiceId, ArInvoice>>,
    next_journal_sequence: Option<u64>,
    journals: Vec<JournalUndo>,
}

/// Every table in the store.
#[derive(Debug, Default)]
pub struct Tables {
    chart: ChartOfAccounts,
    journals: JournalTable,
    budgets: BTreeMap<BudgetId, Budget>,
    fixed_assets: BTreeMap<FixedAssetId, FixedAsset>,
    recon_items: BTreeMap<ReconItemId, ReconItem>,
    ap_invoices: BTreeMap<InvoiceId, ApInvoice>,
    ar_invoices: BTreeMap<InvoiceId, ArInvoice>,
    next_journal_sequence: u64,
    undo: UndoLog,
}

impl Tables {
    /// Chart of accounts with running balances.
    #[must_use]
    pub const fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    /// Chart of accounts, for mutation.
    pub fn chart_mut(&mut self) -> &mut ChartOfAccounts {
        self.undo.chart.get_or_insert_with(|| self.chart.clone());
        &mut self.chart
    }

    /// Journal entries in creation order.
    #[must_use]
    pub fn journals(&self) -> &[JournalEntry] {
        &self.journals.rows
    }

    /// Looks up a journal entry.
    #[must_use]
    pub fn journal(&self, id: JournalEntryId) -> Option<&JournalEntry> {
        let idx = *self.journals.index.get(&id)?;
        self.journals.rows.get(idx)
    }

    /// Looks up a journal entry for mutation.
    pub fn journal_mut(&mut self, id: JournalEntryId) -> Option<&mut JournalEntry> {
        let idx = *self.journals.index.get(&id)?;
        let row = self.journals.rows.get_mut(idx)?;
        self.undo.journals.push(JournalUndo::Changed(idx, row.clone()));
        Some(row)
    }

    /// A journal entry and the chart, both for mutation, as posting needs.
    pub fn posting_target(
        &mut self,
        id: JournalEntryId,
    ) -> Option<(&mut ChartOfAccounts, &mut JournalEntry)> {
        let idx = *self.journals.index.get(&id)?;
        let row = self.journals.rows.get_mut(idx)?;
        self.undo.journals.push(JournalUndo::Changed(idx, row.clone()));
        self.undo.chart.get_or_insert_with(|| self.chart.clone());
        Some((&mut self.chart, row))
    }

    /// Appends a journal entry.
    pub fn push_journal(&mut self, entry: JournalEntry) {
        self.journals.index.insert(entry.id, self.journals.rows.len());
        self.journals.rows.push(entry);
        self.undo.journals.push(JournalUndo::Pushed);
    }

    /// Removes a journal entry, keeping the others in creation order.
    pub fn remove_journal(&mut self, id: JournalEntryId) -> Option<JournalEntry> {
        let idx = self.journals.index.remove(&id)?;
        let entry = self.journals.rows.remove(idx);
        self.journals.reindex_from(idx);
        self.undo.journals.push(JournalUndo::Removed(idx, entry.clone()));
        Some(entry)
    }

    /// Budgets.
    #[must_use]
    pub const fn budgets(&self) -> &BTreeMap<BudgetId, Budget> {
        &self.budgets
    }

    /// Budgets, for mutation.
    pub fn budgets_mut(&mut self) -> &mut BTreeMap<BudgetId, Budget> {
        self.undo.budgets.get_or_insert_with(|| self.budgets.clone());
        &mut self.budgets
    }

    /// Fixed assets.
    #[must_use]
    pub const fn fixed_assets(&self) -> &BTreeMap<FixedAssetId, FixedAsset> {
        &self.fixed_assets
    }

    /// Fixed assets, for mutation.
    pub fn fixed_assets_mut(&mut self) -> &mut BTreeMap<FixedAssetId, FixedAsset> {
        self.undo
            .fixed_assets
            .get_or_insert_with(|| self.fixed_assets.clone());
        &mut self.fixed_assets
    }

    /// External reconciliation items.
    #[must_use]
    pub const fn recon_items(&self) -> &BTreeMap<ReconItemId, ReconItem> {
        &self.recon_items
    }

    /// External reconciliation items, for mutation.
    pub fn recon_items_mut(&mut self) -> &mut BTreeMap<ReconItemId, ReconItem> {
        self.undo
            .recon_items
            .get_or_insert_with(|| self.recon_items.clone());
        &mut self.recon_items
    }

    /// Vendor bills.
    #[must_use]
    pub const fn ap_invoices(&self) -> &BTreeMap<InvoiceId, ApInvoice> {
        &self.ap_invoices
    }

    /// Vendor bills, for mutation.
    pub fn ap_invoices_mut(&mut self) -> &mut BTreeMap<InvoiceId, ApInvoice> {
        self.undo
            .ap_invoices
            .get_or_insert_with(|| self.ap_invoices.clone());
        &mut self.ap_invoices
    }

    /// Customer invoices.
    #[must_use]
    pub const fn ar_invoices(&self) -> &BTreeMap<InvoiceId, ArInvoice> {
        &self.ar_invoices
    }

    /// Customer invoices, for mutation.
    pub fn ar_invoices_mut(&mut self) -> &mut BTreeMap<InvoiceId, ArInvoice> {
        self.undo
            .ar_invoices
            .get_or_insert_with(|| self.ar_invoices.clone());
        &mut self.ar_invoices
    }

    /// Allocates the next journal posting sequence.
    pub fn next_journal_sequence(&mut self) -> u64 {
        self.undo
            .next_journal_sequence
            .get_or_insert(self.next_journal_sequence);
        self.next_journal_sequence += 1;
        self.next_journal_sequence
    }

    fn roll_back(&mut self) {
        let undo = std::mem::take(&mut self.undo);
        if let Some(chart) = undo.chart {
            self.chart = chart;
        }
        if let Some(budgets) = undo.budgets {
            self.budgets = budgets;
        }
        if let Some(fixed_assets) = undo.fixed_assets {
            self.fixed_assets = fixed_assets;
        }
        if let Some(recon_items) = undo.recon_items {
            self.recon_items = recon_items;
        }
        if let Some(ap_invoices) = undo.ap_invoices {
            self.ap_invoices = ap_invoices;
        }
        if let Some(ar_invoices) = undo.ar_invoices {
            self.ar_invoices = ar_invoices;
        }
        if let Some(sequence) = undo.next_journal_sequence {
            self.next_journal_sequence = sequence;
        }
        for change in undo.journals.into_iter().rev() {
            match change {
                JournalUndo::Pushed => {
                    if let Some(entry) = self.journals.rows.pop() {
                        self.journals.index.remove(&entry.id);
                    }
                }
                JournalUndo::Changed(idx, entry) => {
                    if let Some(row) = self.journals.rows.get_mut(idx) {
                        *row = entry;
                    }
                }
                JournalUndo::Removed(idx, entry) => {
                    self.journals.rows.insert(idx, entry);
                    self.journals.reindex_from(idx);
                }
            }
        }
    }
}

/// Shared handle to the store.
#[derive(Debug, Clone, Default)]
pub struct Database {
    inner: Arc<RwLock<Tables>>,
}

impl Database {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a unit of work, blocking until no other one is open.
    ///
    /// # Errors
    ///
    /// `LockPoisoned` if a previous writer panicked.
    pub fn begin(&self) -> Result<DatabaseTransaction<'_>, DbError> {
        let guard = self.inner.write().map_err(|_| DbError::LockPoisoned)?;
        Ok(DatabaseTransaction {
            guard,
            committed: false,
        })
    }

    /// Runs `f` against a consistent snapshot.
    ///
    /// # Errors
    ///
    /// `LockPoisoned` if a previous writer panicked.
    pub fn read<T, F>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Tables) -> T,
    {
        let guard = self.inner.read().map_err(|_| DbError::LockPoisoned)?;
        Ok(f(&guard))
    }

    /// Runs `f` in a unit of work, committing only if it succeeds.
    ///
    /// # Errors
    ///
    /// Whatever `f` returns, or `LockPoisoned`.
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Tables) -> Result<T, E>,
        E: From<DbError>,
    {
        let mut txn = self.begin()?;
        let value = f(&mut txn)?;
        txn.commit();
        Ok(value)
    }
}

/// An open unit of work.
#[derive(Debug)]
pub struct DatabaseTransaction<'a> {
    guard: RwLockWriteGuard<'a, Tables>,
    committed: bool,
}

impl DatabaseTransaction<'_> {
    /// Publishes every change made in this unit of work.
    pub fn commit(mut self) {
        self.guard.undo = UndoLog::default();
        self.committed = true;
    }

    /// Discards every change made in this unit of work.
    pub fn rollback(self) {}
}

impl Drop for DatabaseTransaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.guard.roll_back();
        }
    }
}

impl Deref for DatabaseTransaction<'_> {
    type Target = Tables;

    fn deref(&self) -> &Tables {
        &self.guard
    }
}

impl DerefMut for DatabaseTransaction<'_> {
    fn deref_mut(&mut self) -> &mut Tables {
        &mut self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tally_core::ledger::{
        AccountType, CreateJournalInput, JournalLineInput, JournalService, NewAccount,
    };
    use tally_shared::types::AccountId;

    fn entry(description: &str) -> JournalEntry {
        let input = CreateJournalInput {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            period: None,
            description: description.to_string(),
            reference: None,
            lines: vec![JournalLineInput::debit(AccountId::new(), Decimal::ONE)],
        };
        JournalService::build_entry(input, 1, |_| true).unwrap()
    }

    fn ids(db: &Database) -> Vec<JournalEntryId> {
        db.read(|t| t.journals().iter().map(|j| j.id).collect()).unwrap()
    }

    #[test]
    fn test_commit_publishes_changes() {
        let db = Database::new();
        let mut txn = db.begin().unwrap();
        txn.chart_mut()
            .insert(NewAccount::new("1000", "Cash", AccountType::Asset))
            .unwrap();
        txn.commit();

        assert_eq!(db.read(|t| t.chart().len()).unwrap(), 1);
    }

    #[test]
    fn test_drop_rolls_back() {
        let db = Database::new();
        {
            let mut txn = db.begin().unwrap();
            txn.chart_mut()
                .insert(NewAccount::new("1000", "Cash", AccountType::Asset))
                .unwrap();
            assert_eq!(txn.next_journal_sequence(), 1);
        }
        assert!(db.read(|t| t.chart().is_empty()).unwrap());

        // The sequence allocated in the rolled-back unit is reused.
        let mut txn = db.begin().unwrap();
        assert_eq!(txn.next_journal_sequence(), 1);
        txn.rollback();
    }

    #[test]
    fn test_failed_closure_leaves_store_untouched() {
        #[derive(Debug)]
        struct Boom;
        impl From<DbError> for Boom {
            fn from(_: DbError) -> Self {
                Boom
            }
        }

        let db = Database::new();
        let result: Result<(), Boom> = db.transaction(|t| {
            t.chart_mut()
                .insert(NewAccount::new("1000", "Cash", AccountType::Asset))
                .map_err(|_| Boom)?;
            Err(Boom)
        });

        assert!(result.is_err());
        assert!(db.read(|t| t.chart().is_empty()).unwrap());
    }

    #[test]
    fn test_rollback_restores_journal_rows_and_index() {
        let db = Database::new();
        let (a, b, c) = (entry("a"), entry("b"), entry("c"));
        let before = vec![a.id, b.id, c.id];
        let mut txn = db.begin().unwrap();
        for e in [a.clone(), b.clone(), c] {
            txn.push_journal(e);
        }
        txn.commit();

        {
            let mut txn = db.begin().unwrap();
            txn.remove_journal(b.id).unwrap();
            txn.journal_mut(a.id).unwrap().description = "changed".to_string();
            txn.push_journal(entry("d"));
            assert_eq!(txn.journals().len(), 3);
        }

        assert_eq!(ids(&db), before);
        db.read(|t| {
            assert_eq!(t.journal(a.id).unwrap().description, "a");
            assert_eq!(t.journal(b.id).unwrap().description, "b");
            for (idx, id) in before.iter().enumerate() {
                assert_eq!(t.journals()[idx].id, *id);
                assert_eq!(t.journal(*id).unwrap().id, *id);
            }
        })
        .unwrap();
    }

    #[test]
    fn test_removed_journal_shifts_later_lookups() {
        let db = Database::new();
        let (a, b, c) = (entry("a"), entry("b"), entry("c"));
        db.transaction(|t| {
            for e in [a.clone(), b.clone(), c.clone()] {
                t.push_journal(e);
            }
            t.remove_journal(a.id);
            Ok::<_, DbError>(())
        })
        .unwrap();

        assert_eq!(ids(&db), vec![b.id, c.id]);
        db.read(|t| {
            assert!(t.journal(a.id).is_none());
            assert_eq!(t.journal(c.id).unwrap().description, "c");
        })
        .unwrap();
    }

    #[test]
    fn test_untouched_tables_survive_rollback() {
        let db = Database::new();
        db.transaction(|t| {
            t.chart_mut()
                .insert(NewAccount::new("1000", "Cash", AccountType::Asset))?;
            Ok::<_, Box<dyn std::error::Error>>(())
        })
        .unwrap();

        {
            let mut txn = db.begin().unwrap();
            txn.push_journal(entry("only journals"));
        }

        assert_eq!(db.read(|t| t.chart().len()).unwrap(), 1);
        assert!(ids(&db).is_empty());
    }
}
