//! Transactional ledger store with repositories.
//!
//! This crate provides:
//! - `Database`, an in-memory store whose units of work commit or roll back
//!   as a whole
//! - Repository abstractions that run every workflow in one unit of work

pub mod repositories;
pub mod store;

pub use repositories::{
    AccountRepository, BudgetRepository, FixedAssetRepository, InvoiceRepository,
    JournalRepository, ReconciliationRepository, ReportRepository,
};
pub use store::{Database, DatabaseTransaction, DbError, Tables};
