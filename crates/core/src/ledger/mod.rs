//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Account types and the debit/credit sign convention
//! - Chart of accounts (arena with acyclic hierarchy)
//! - Journal entries and their lifecycle
//! - Posting engine applying lines to account balances
//! - Business rule validation
//! - Error types for ledger operations

pub mod account;
pub mod balance;
pub mod chart;
pub mod entry;
pub mod error;
pub mod posting;
pub mod service;
pub mod types;
pub mod validation;
pub mod workflow;

#[cfg(test)]
mod posting_props;
#[cfg(test)]
mod validation_props;

pub use account::{Account, NewAccount};
pub use balance::RunningBalance;
pub use chart::ChartOfAccounts;
pub use entry::{JournalEntry, JournalLine};
pub use error::LedgerError;
pub use posting::{PostedLine, PostingEngine, PostingResult};
pub use service::JournalService;
pub use types::{
    AccountStatus, AccountType, CashFlowCategory, CreateJournalInput, JournalLineInput,
    JournalStatus, JournalTotals, NormalBalance,
};
pub use validation::{is_two_sided, validate_balanced, validate_line_inputs};
pub use workflow::JournalWorkflow;
