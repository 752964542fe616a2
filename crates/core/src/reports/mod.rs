//! Financial report generation.
//!
//! This module provides pure business logic for generating financial reports:
//! - Trial Balance
//! - Income Statement
//! - Balance Sheet
//! - Cash Flow Statement
//! - Account Ledger
//! - Period Summary

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
