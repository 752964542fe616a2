//! Invoice types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, InvoiceId};

/// Invoice settlement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Awaiting payment.
    #[default]
    Pending,
    /// Past its due date.
    Overdue,
    /// Some but not all of the balance received.
    PartiallyPaid,
    /// Settled in full.
    Paid,
}

impl InvoiceStatus {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Overdue => "OVERDUE",
            Self::PartiallyPaid => "PARTIALLY_PAID",
            Self::Paid => "PAID",
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vendor or customer on an invoice.
///
/// `account_id` is the counterparty's own sub-ledger account; without one
/// the invoice posts against the control account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    /// Display name.
    pub name: String,
    /// Sub-ledger account.
    pub account_id: Option<AccountId>,
}

impl Counterparty {
    /// A counterparty posting against the control account.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            account_id: None,
        }
    }
}

/// A payment applied to an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePayment {
    /// Payment date.
    pub payment_date: NaiveDate,
    /// Amount paid.
    pub amount: Decimal,
    /// How it was paid.
    pub payment_method: Option<String>,
    /// External reference.
    pub reference: Option<String>,
}

/// Vendor bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApInvoice {
    /// Invoice ID.
    pub id: InvoiceId,
    /// Vendor's invoice number, unique among payables.
    pub invoice_number: String,
    /// Vendor.
    pub vendor: Counterparty,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Amount owed.
    pub amount: Decimal,
    /// Free text.
    pub description: Option<String>,
    /// Settlement status.
    pub status: InvoiceStatus,
    /// Payments made.
    pub payments: Vec<InvoicePayment>,
}

/// Input for recording a vendor bill.
#[derive(Debug, Clone)]
pub struct CreateApInvoiceInput {
    /// Vendor's invoice number.
    pub invoice_number: String,
    /// Vendor.
    pub vendor: Counterparty,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Amount owed.
    pub amount: Decimal,
    /// Free text.
    pub description: Option<String>,
}

/// One billed item on a customer invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Item description.
    pub description: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// quantity × unit_price.
    pub total: Decimal,
}

/// Input for one billed item.
#[derive(Debug, Clone)]
pub struct InvoiceItemInput {
    /// Item description.
    pub description: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
}

/// Customer invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArInvoice {
    /// Invoice ID.
    pub id: InvoiceId,
    /// Invoice number, unique among receivables.
    pub invoice_number: String,
    /// Customer.
    pub customer: Counterparty,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Sum of item totals.
    pub subtotal: Decimal,
    /// Tax added.
    pub tax_amount: Decimal,
    /// Discount taken off.
    pub discount_amount: Decimal,
    /// Invoice total.
    pub amount: Decimal,
    /// Amount still outstanding.
    pub balance: Decimal,
    /// Free text.
    pub description: Option<String>,
    /// Settlement status.
    pub status: InvoiceStatus,
    /// Billed items.
    pub items: Vec<InvoiceItem>,
    /// Payments received.
    pub payments: Vec<InvoicePayment>,
}

/// Input for issuing a customer invoice.
///
/// When `amount` is absent the total is computed from the items, tax and
/// discount.
#[derive(Debug, Clone)]
pub struct CreateArInvoiceInput {
    /// Invoice number.
    pub invoice_number: String,
    /// Customer.
    pub customer: Counterparty,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Explicit total.
    pub amount: Option<Decimal>,
    /// Billed items.
    pub items: Vec<InvoiceItemInput>,
    /// Tax added.
    pub tax_amount: Decimal,
    /// Discount taken off.
    pub discount_amount: Decimal,
    /// Free text.
    pub description: Option<String>,
}

/// Input for a customer payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
    /// Payment date.
    pub payment_date: NaiveDate,
    /// Amount received.
    pub amount: Decimal,
    /// How it was paid.
    pub payment_method: Option<String>,
    /// External reference.
    pub reference: Option<String>,
}
