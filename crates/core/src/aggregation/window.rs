//! Entry selection windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fiscal::PeriodLabel;
use crate::ledger::{JournalEntry, LedgerError};

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Creates a window `[start, end]`.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, LedgerError> {
        if start > end {
            return Err(LedgerError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Point-in-time window from the beginning of the books through `as_of`.
    #[must_use]
    pub const fn through(as_of: NaiveDate) -> Self {
        Self {
            start: NaiveDate::MIN,
            end: as_of,
        }
    }

    /// First day included.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day included.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns true if `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Which posted entries a computation reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EntrySelection {
    /// Exact period label match.
    Period(PeriodLabel),
    /// Transaction date inside the window.
    Dates(DateWindow),
}

impl EntrySelection {
    /// Returns true if the entry is POSTED and inside the selection.
    #[must_use]
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        if !entry.is_posted() {
            return false;
        }
        match self {
            Self::Period(label) => entry.period == *label,
            Self::Dates(window) => window.contains(entry.date),
        }
    }
}

impl From<DateWindow> for EntrySelection {
    fn from(window: DateWindow) -> Self {
        Self::Dates(window)
    }
}

impl From<PeriodLabel> for EntrySelection {
    fn from(label: PeriodLabel) -> Self {
        Self::Period(label)
    }
}
