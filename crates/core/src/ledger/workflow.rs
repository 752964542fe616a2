//! Journal entry state machine.
//!
//! Transitions: DRAFT → APPROVAL (submit), APPROVAL → POSTED (post).
//! Deletion is allowed until the entry is posted.

use super::error::LedgerError;
use super::types::JournalStatus;

/// Stateless validator for journal status transitions.
pub struct JournalWorkflow;

impl JournalWorkflow {
    /// Submits a draft for approval.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the entry is a draft.
    pub fn submit(current: JournalStatus) -> Result<JournalStatus, LedgerError> {
        Self::transition(current, JournalStatus::Approval)
    }

    /// Checks that an entry may be posted.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the entry is awaiting posting.
    pub fn post(current: JournalStatus) -> Result<JournalStatus, LedgerError> {
        Self::transition(current, JournalStatus::Posted)
    }

    /// Checks that an entry may be deleted.
    ///
    /// # Errors
    ///
    /// `CannotModifyPosted` for posted entries.
    pub fn ensure_deletable(current: JournalStatus) -> Result<(), LedgerError> {
        if current.is_immutable() {
            return Err(LedgerError::CannotModifyPosted);
        }
        Ok(())
    }

    /// Returns true if `from → to` is a legal transition.
    #[must_use]
    pub fn is_valid_transition(from: JournalStatus, to: JournalStatus) -> bool {
        matches!(
            (from, to),
            (JournalStatus::Draft, JournalStatus::Approval)
                | (JournalStatus::Approval, JournalStatus::Posted)
        )
    }

    fn transition(from: JournalStatus, to: JournalStatus) -> Result<JournalStatus, LedgerError> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(LedgerError::InvalidTransition { from, to })
        }
    }
}
