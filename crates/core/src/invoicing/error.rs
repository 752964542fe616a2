//! Invoice error types.

use rust_decimal::Decimal;
use tally_shared::AppError;
use tally_shared::types::InvoiceId;
use thiserror::Error;

use crate::ledger::LedgerError;

/// Errors from payables and receivables workflows.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    NotFound(InvoiceId),

    /// Invoice number already used.
    #[error("Invoice number already exists: {0}")]
    DuplicateInvoiceNumber(String),

    /// Amounts cannot be negative.
    #[error("Invoice amounts cannot be negative")]
    NegativeAmount,

    /// Payment amount must be positive.
    #[error("Payment amount must be positive, got {0}")]
    InvalidPaymentAmount(Decimal),

    /// Payment exceeds the outstanding balance.
    #[error("Payment {amount} exceeds outstanding balance {balance}")]
    Overpayment {
        /// Outstanding balance.
        balance: Decimal,
        /// Attempted payment.
        amount: Decimal,
    },

    /// Invoice is already settled.
    #[error("Invoice {0} is already paid")]
    AlreadyPaid(String),

    /// Journal or account failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl InvoiceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "INVOICE_NOT_FOUND",
            Self::DuplicateInvoiceNumber(_) => "DUPLICATE_INVOICE_NUMBER",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::InvalidPaymentAmount(_) => "INVALID_PAYMENT_AMOUNT",
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::AlreadyPaid(_) => "INVOICE_ALREADY_PAID",
            Self::Ledger(e) => e.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::DuplicateInvoiceNumber(_)
            | Self::NegativeAmount
            | Self::InvalidPaymentAmount(_)
            | Self::Overpayment { .. } => 400,
            Self::AlreadyPaid(_) => 422,
            Self::Ledger(e) => e.http_status_code(),
        }
    }
}

impl From<InvoiceError> for AppError {
    fn from(err: InvoiceError) -> Self {
        Self::from_status(err.http_status_code(), err.to_string())
    }
}
