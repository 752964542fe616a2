//! Year-month period labels.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ledger::LedgerError;

/// A calendar year-month label of the form `YYYY-MM`.
///
/// Entries are selected by exact label match, independently of their date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodLabel(String);

impl PeriodLabel {
    /// Label of the month containing `date`.
    ///
    /// # Errors
    ///
    /// `InvalidPeriodLabel` for years outside 0000 to 9999, which have no
    /// four-digit label.
    pub fn from_date(date: NaiveDate) -> Result<Self, LedgerError> {
        Self::parse(&format!("{:04}-{:02}", date.year(), date.month()))
    }

    /// Parses and validates a label.
    ///
    /// # Errors
    ///
    /// `InvalidPeriodLabel` unless the input is four digits, a dash, and a
    /// month from 01 to 12.
    pub fn parse(label: &str) -> Result<Self, LedgerError> {
        let invalid = || LedgerError::InvalidPeriodLabel(label.to_string());
        let (year, month) = label.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self(label.to_string()))
    }

    /// Returns the label text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PeriodLabel {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PeriodLabel {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PeriodLabel> for String {
    fn from(label: PeriodLabel) -> Self {
        label.0
    }
}
