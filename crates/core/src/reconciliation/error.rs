//! Reconciliation error types.

use tally_shared::AppError;
use tally_shared::types::{JournalEntryId, JournalLineId, ReconItemId};
use thiserror::Error;

/// Errors from reconciliation workflows.
#[derive(Debug, Error)]
pub enum ReconError {
    /// Item not found.
    #[error("Reconciliation item not found: {0}")]
    NotFound(ReconItemId),

    /// Item is already matched.
    #[error("Reconciliation item {0} is already matched")]
    AlreadyMatched(ReconItemId),

    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    JournalNotFound(JournalEntryId),

    /// Line not part of the journal entry.
    #[error("Journal line not found: {0}")]
    LineNotFound(JournalLineId),

    /// Only posted lines can be matched.
    #[error("Journal entry {0} is not posted")]
    JournalNotPosted(JournalEntryId),
}

impl ReconError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "RECON_ITEM_NOT_FOUND",
            Self::AlreadyMatched(_) => "RECON_ITEM_ALREADY_MATCHED",
            Self::JournalNotFound(_) => "JOURNAL_NOT_FOUND",
            Self::LineNotFound(_) => "JOURNAL_LINE_NOT_FOUND",
            Self::JournalNotPosted(_) => "JOURNAL_NOT_POSTED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::JournalNotFound(_) | Self::LineNotFound(_) => 404,
            Self::AlreadyMatched(_) | Self::JournalNotPosted(_) => 422,
        }
    }
}

impl From<ReconError> for AppError {
    fn from(err: ReconError) -> Self {
        Self::from_status(err.http_status_code(), err.to_string())
    }
}
