//! Core business logic for Tally.
//!
//! This crate contains pure ledger logic with ZERO storage dependencies.
//! All domain types, validation rules, and calculations live here; the
//! `tally-db` crate wraps them in units of work.
//!
//! # Modules
//!
//! - `ledger` - Chart of accounts, journal lifecycle, and posting
//! - `fiscal` - Calendar period labels
//! - `aggregation` - Per-account movement over posted entries
//! - `reports` - Trial balance, statements, and account ledgers
//! - `budget` - Budget lifecycle and variance analysis
//! - `assets` - Fixed asset depreciation and disposal
//! - `reconciliation` - Matching external items to journal lines
//! - `invoicing` - Payables and receivables

pub mod aggregation;
pub mod assets;
pub mod budget;
pub mod fiscal;
pub mod invoicing;
pub mod ledger;
pub mod reconciliation;
pub mod reports;

#[cfg(test)]
mod test_fixtures;
