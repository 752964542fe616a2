//! Repository implementations for ledger workflows.
//!
//! Every mutating method runs in one unit of work: either all of its
//! writes commit, or none do.

pub mod account;
pub mod budget;
pub mod fixed_asset;
pub mod invoice;
pub mod journal;
pub mod reconciliation;
pub mod report;

pub use account::{AccountRepoError, AccountRepository};
pub use budget::{BudgetRepoError, BudgetRepository};
pub use fixed_asset::{
    AssetRepoError, DepreciationRun, DisposalResult, FixedAssetRepository, RegisteredAsset,
};
pub use invoice::{InvoiceRepoError, InvoiceRepository, PaymentRecord, PostedInvoice};
pub use journal::{JournalRepoError, JournalRepository, PostedJournal};
pub use reconciliation::{ReconRepoError, ReconciliationRepository};
pub use report::{ReportRepoError, ReportRepository};
