//! Reconciliation repository: import, suggest, resolve.

use rust_decimal::Decimal;
use tally_core::fiscal::PeriodLabel;
use tally_core::reconciliation::{
    MatchSuggestion, NewReconItem, ReconError, ReconItem, ReconMatcher, ReconStatus,
};
use tally_shared::AppError;
use tally_shared::types::{JournalEntryId, JournalLineId, ReconItemId};
use tracing::info;

use crate::store::{Database, DbError};

/// Error types for reconciliation operations.
#[derive(Debug, thiserror::Error)]
pub enum ReconRepoError {
    /// Reconciliation rule violated.
    #[error(transparent)]
    Recon(#[from] ReconError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<ReconRepoError> for AppError {
    fn from(err: ReconRepoError) -> Self {
        match err {
            ReconRepoError::Recon(e) => e.into(),
            ReconRepoError::Database(e) => e.into(),
        }
    }
}

/// Reconciliation repository.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    db: Database,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Imports external items as UNMATCHED.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn import(&self, items: Vec<NewReconItem>) -> Result<Vec<ReconItem>, ReconRepoError> {
        let imported = self.db.transaction(|t| {
            let imported: Vec<ReconItem> = items.into_iter().map(ReconItem::from).collect();
            for item in &imported {
                t.recon_items_mut().insert(item.id, item.clone());
            }
            Ok::<_, ReconRepoError>(imported)
        })?;
        info!(count = imported.len(), "Reconciliation items imported");
        Ok(imported)
    }

    /// Lists items, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn list_items(
        &self,
        status: Option<ReconStatus>,
    ) -> Result<Vec<ReconItem>, ReconRepoError> {
        Ok(self.db.read(|t| {
            t.recon_items()
                .values()
                .filter(|i| status.is_none_or(|s| i.status == s))
                .cloned()
                .collect()
        })?)
    }

    /// Suggests matches between unmatched items and posted lines of a
    /// period.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn suggest_matches(
        &self,
        period: &PeriodLabel,
    ) -> Result<Vec<MatchSuggestion>, ReconRepoError> {
        Ok(self.db.read(|t| {
            let items: Vec<ReconItem> = t.recon_items().values().cloned().collect();
            ReconMatcher::suggest(&items, t.journals(), period)
        })?)
    }

    /// Matches an item to a line of a posted journal.
    ///
    /// # Errors
    ///
    /// `NotFound`, `JournalNotFound`, `AlreadyMatched`, `JournalNotPosted`,
    /// or `LineNotFound`.
    pub fn resolve(
        &self,
        item_id: ReconItemId,
        journal_id: JournalEntryId,
        line_id: JournalLineId,
        variance: Option<Decimal>,
    ) -> Result<ReconItem, ReconRepoError> {
        let item = self.db.transaction(|t| {
            let entry = t
                .journal(journal_id)
                .cloned()
                .ok_or(ReconError::JournalNotFound(journal_id))?;
            let item = t
                .recon_items_mut()
                .get_mut(&item_id)
                .ok_or(ReconError::NotFound(item_id))?;
            ReconMatcher::resolve(item, &entry, line_id, variance)?;
            Ok::<_, ReconRepoError>(item.clone())
        })?;
        info!(
            recon_item_id = %item_id,
            journal_id = %journal_id,
            journal_line_id = %line_id,
            variance = %item.variance,
            "Reconciliation item matched"
        );
        Ok(item)
    }
}
