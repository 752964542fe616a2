//! Payables and receivables invoices and the journals they generate.

pub mod error;
pub mod service;
pub mod types;


pub use error::InvoiceError;
pub use service::{InvoiceAccounts, InvoiceService};
pub use types::{
    ApInvoice, ArInvoice, Counterparty, CreateApInvoiceInput, CreateArInvoiceInput, InvoiceItem,
    InvoiceItemInput, InvoicePayment, InvoiceStatus, RecordPaymentInput,
};
