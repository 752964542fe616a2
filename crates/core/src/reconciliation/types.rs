//! Reconciliation data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{JournalEntryId, JournalLineId, ReconItemId};

/// Match status of an external item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconStatus {
    /// Not yet matched.
    #[default]
    Unmatched,
    /// Matched to a journal line.
    Matched,
}

/// An external transaction awaiting reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconItem {
    /// Item ID.
    pub id: ReconItemId,
    /// Transaction date on the external statement.
    pub date: NaiveDate,
    /// Amount on the external statement.
    pub amount: Decimal,
    /// External reference.
    pub reference: Option<String>,
    /// Match status.
    pub status: ReconStatus,
    /// Matched journal entry.
    pub matched_journal_id: Option<JournalEntryId>,
    /// Matched journal line.
    pub matched_journal_line_id: Option<JournalLineId>,
    /// Difference accepted when matching.
    pub variance: Decimal,
}

/// An imported external transaction.
#[derive(Debug, Clone)]
pub struct NewReconItem {
    /// Transaction date.
    pub date: NaiveDate,
    /// Amount.
    pub amount: Decimal,
    /// External reference.
    pub reference: Option<String>,
}

impl From<NewReconItem> for ReconItem {
    fn from(input: NewReconItem) -> Self {
        Self {
            id: ReconItemId::new(),
            date: input.date,
            amount: input.amount,
            reference: input.reference,
            status: ReconStatus::Unmatched,
            matched_journal_id: None,
            matched_journal_line_id: None,
            variance: Decimal::ZERO,
        }
    }
}

/// A proposed pairing of an external item with a journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSuggestion {
    /// External item.
    pub recon_item_id: ReconItemId,
    /// Journal entry of the candidate line.
    pub journal_id: JournalEntryId,
    /// Candidate line.
    pub journal_line_id: JournalLineId,
    /// 100 minus the distance in days, floored at zero.
    pub score: u32,
}
