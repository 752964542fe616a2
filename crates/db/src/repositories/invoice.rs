//! Invoice repository for payables and receivables workflows.
//!
//! Each workflow stores the invoice and posts its journal in the same unit
//! of work.

use chrono::NaiveDate;
use serde::Serialize;
use tally_core::invoicing::{
    ApInvoice, ArInvoice, Counterparty, CreateApInvoiceInput, CreateArInvoiceInput,
    InvoiceAccounts, InvoiceError, InvoicePayment, InvoiceService, RecordPaymentInput,
};
use tally_core::ledger::LedgerError;
use tally_shared::types::InvoiceId;
use tally_shared::{AccountCodes, AppError};
use tracing::info;

use super::journal::{PostedJournal, create_and_post_in};
use crate::store::{Database, DbError};

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceRepoError {
    /// Invoice rule violated.
    #[error(transparent)]
    Invoice(#[from] InvoiceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<LedgerError> for InvoiceRepoError {
    fn from(err: LedgerError) -> Self {
        Self::Invoice(err.into())
    }
}

impl From<InvoiceRepoError> for AppError {
    fn from(err: InvoiceRepoError) -> Self {
        match err {
            InvoiceRepoError::Invoice(e) => e.into(),
            InvoiceRepoError::Database(e) => e.into(),
        }
    }
}

/// An invoice together with the journal its workflow posted.
#[derive(Debug, Clone, Serialize)]
pub struct PostedInvoice<T> {
    /// The invoice after the workflow.
    pub invoice: T,
    /// The posted journal.
    pub journal: PostedJournal,
}

/// One payment with the invoice it settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRecord {
    /// The invoice paid.
    pub invoice_id: InvoiceId,
    /// Its number.
    pub invoice_number: String,
    /// Vendor or customer name.
    pub counterparty: String,
    /// The payment itself.
    pub payment: InvoicePayment,
}

fn payment_history<'a, I>(invoices: I) -> Vec<PaymentRecord>
where
    I: IntoIterator<Item = (InvoiceId, &'a str, &'a Counterparty, &'a [InvoicePayment])>,
{
    let mut history: Vec<PaymentRecord> = invoices
        .into_iter()
        .flat_map(|(invoice_id, number, counterparty, payments)| {
            payments.iter().map(move |payment| PaymentRecord {
                invoice_id,
                invoice_number: number.to_string(),
                counterparty: counterparty.name.clone(),
                payment: payment.clone(),
            })
        })
        .collect();
    history.sort_by(|a, b| {
        a.payment
            .payment_date
            .cmp(&b.payment.payment_date)
            .then_with(|| a.invoice_number.cmp(&b.invoice_number))
    });
    history
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: Database,
    codes: AccountCodes,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: Database, codes: AccountCodes) -> Self {
        Self { db, codes }
    }

    /// Opens a vendor's payable sub-ledger account.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn open_vendor(&self, name: &str) -> Result<Counterparty, InvoiceRepoError> {
        self.db.transaction(|t| {
            let account = InvoiceService::open_vendor_account(t.chart_mut(), &self.codes, name)?;
            Ok::<_, InvoiceRepoError>(account)
        })
    }

    /// Opens a customer's receivable sub-ledger account.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn open_customer(&self, name: &str) -> Result<Counterparty, InvoiceRepoError> {
        self.db.transaction(|t| {
            let account =
                InvoiceService::open_customer_account(t.chart_mut(), &self.codes, name)?;
            Ok::<_, InvoiceRepoError>(account)
        })
    }

    /// Records a vendor bill and posts debit expense, credit payable.
    ///
    /// # Errors
    ///
    /// `DuplicateInvoiceNumber`, `NegativeAmount`, or a missing vendor
    /// account.
    pub fn create_ap_invoice(
        &self,
        input: CreateApInvoiceInput,
    ) -> Result<PostedInvoice<ApInvoice>, InvoiceRepoError> {
        let posted = self.db.transaction(|t| {
            let invoice = InvoiceService::create_ap_invoice(input, |n| {
                t.ap_invoices().values().any(|i| i.invoice_number == n)
            })?;
            let accounts =
                InvoiceAccounts::for_ap_invoice(t.chart_mut(), &self.codes, &invoice.vendor)?;
            let journal =
                create_and_post_in(t, InvoiceService::ap_invoice_journal(&invoice, accounts))?;
            t.ap_invoices_mut().insert(invoice.id, invoice.clone());
            Ok::<_, InvoiceRepoError>(PostedInvoice { invoice, journal })
        })?;
        info!(
            invoice_id = %posted.invoice.id,
            invoice_number = %posted.invoice.invoice_number,
            amount = %posted.invoice.amount,
            "AP invoice created"
        );
        Ok(posted)
    }

    /// Pays a vendor bill in full and posts debit payable, credit cash.
    ///
    /// # Errors
    ///
    /// `NotFound` or `AlreadyPaid`.
    pub fn pay_ap_invoice(
        &self,
        id: InvoiceId,
        payment_date: NaiveDate,
    ) -> Result<PostedInvoice<ApInvoice>, InvoiceRepoError> {
        let posted = self.db.transaction(|t| {
            let mut invoice = t
                .ap_invoices()
                .get(&id)
                .cloned()
                .ok_or(InvoiceError::NotFound(id))?;
            let payment = InvoiceService::pay_ap_invoice(&mut invoice, payment_date)?;
            let accounts =
                InvoiceAccounts::for_ap_payment(t.chart_mut(), &self.codes, &invoice.vendor)?;
            let journal = create_and_post_in(
                t,
                InvoiceService::ap_payment_journal(&invoice, &payment, accounts),
            )?;
            t.ap_invoices_mut().insert(id, invoice.clone());
            Ok::<_, InvoiceRepoError>(PostedInvoice { invoice, journal })
        })?;
        info!(invoice_id = %id, amount = %posted.invoice.amount, "AP invoice paid");
        Ok(posted)
    }

    /// Issues a customer invoice and posts debit receivable, credit revenue.
    ///
    /// # Errors
    ///
    /// `DuplicateInvoiceNumber`, `NegativeAmount`, or a missing customer
    /// account.
    pub fn create_ar_invoice(
        &self,
        input: CreateArInvoiceInput,
    ) -> Result<PostedInvoice<ArInvoice>, InvoiceRepoError> {
        let posted = self.db.transaction(|t| {
            let invoice = InvoiceService::create_ar_invoice(input, |n| {
                t.ar_invoices().values().any(|i| i.invoice_number == n)
            })?;
            let accounts =
                InvoiceAccounts::for_ar_invoice(t.chart_mut(), &self.codes, &invoice.customer)?;
            let journal =
                create_and_post_in(t, InvoiceService::ar_invoice_journal(&invoice, accounts))?;
            t.ar_invoices_mut().insert(invoice.id, invoice.clone());
            Ok::<_, InvoiceRepoError>(PostedInvoice { invoice, journal })
        })?;
        info!(
            invoice_id = %posted.invoice.id,
            invoice_number = %posted.invoice.invoice_number,
            amount = %posted.invoice.amount,
            "AR invoice created"
        );
        Ok(posted)
    }

    /// Applies a customer payment and posts debit cash, credit receivable.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidPaymentAmount`, or `Overpayment`.
    pub fn record_ar_payment(
        &self,
        id: InvoiceId,
        input: RecordPaymentInput,
    ) -> Result<PostedInvoice<ArInvoice>, InvoiceRepoError> {
        let posted = self.db.transaction(|t| {
            let mut invoice = t
                .ar_invoices()
                .get(&id)
                .cloned()
                .ok_or(InvoiceError::NotFound(id))?;
            let payment = InvoiceService::record_ar_payment(&mut invoice, input)?;
            let accounts =
                InvoiceAccounts::for_ar_payment(t.chart_mut(), &self.codes, &invoice.customer)?;
            let journal = create_and_post_in(
                t,
                InvoiceService::ar_payment_journal(&invoice, &payment, accounts),
            )?;
            t.ar_invoices_mut().insert(id, invoice.clone());
            Ok::<_, InvoiceRepoError>(PostedInvoice { invoice, journal })
        })?;
        info!(
            invoice_id = %id,
            balance = %posted.invoice.balance,
            status = %posted.invoice.status,
            "AR payment recorded"
        );
        Ok(posted)
    }

    /// Flags pending invoices past their due date as OVERDUE and returns
    /// how many changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn mark_overdue(&self, as_of: NaiveDate) -> Result<usize, InvoiceRepoError> {
        let changed = self.db.transaction(|t| {
            let mut changed = 0;
            for invoice in t.ap_invoices_mut().values_mut() {
                let next = InvoiceService::overdue_status(invoice.status, invoice.due_date, as_of);
                if next != invoice.status {
                    invoice.status = next;
                    changed += 1;
                }
            }
            for invoice in t.ar_invoices_mut().values_mut() {
                let next = InvoiceService::overdue_status(invoice.status, invoice.due_date, as_of);
                if next != invoice.status {
                    invoice.status = next;
                    changed += 1;
                }
            }
            Ok::<_, InvoiceRepoError>(changed)
        })?;
        info!(%as_of, changed, "Overdue invoices flagged");
        Ok(changed)
    }

    /// Finds a vendor bill.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn find_ap_invoice(&self, id: InvoiceId) -> Result<Option<ApInvoice>, InvoiceRepoError> {
        Ok(self.db.read(|t| t.ap_invoices().get(&id).cloned())?)
    }

    /// Finds a customer invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn find_ar_invoice(&self, id: InvoiceId) -> Result<Option<ArInvoice>, InvoiceRepoError> {
        Ok(self.db.read(|t| t.ar_invoices().get(&id).cloned())?)
    }

    /// All vendor bills.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn list_ap_invoices(&self) -> Result<Vec<ApInvoice>, InvoiceRepoError> {
        Ok(self.db.read(|t| t.ap_invoices().values().cloned().collect())?)
    }

    /// All customer invoices.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn list_ar_invoices(&self) -> Result<Vec<ArInvoice>, InvoiceRepoError> {
        Ok(self.db.read(|t| t.ar_invoices().values().cloned().collect())?)
    }

    /// Every vendor payment, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn ap_payment_history(&self) -> Result<Vec<PaymentRecord>, InvoiceRepoError> {
        Ok(self.db.read(|t| {
            payment_history(t.ap_invoices().values().map(|i| {
                (i.id, i.invoice_number.as_str(), &i.vendor, i.payments.as_slice())
            }))
        })?)
    }

    /// Every customer payment, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn ar_payment_history(&self) -> Result<Vec<PaymentRecord>, InvoiceRepoError> {
        Ok(self.db.read(|t| {
            payment_history(t.ar_invoices().values().map(|i| {
                (i.id, i.invoice_number.as_str(), &i.customer, i.payments.as_slice())
            }))
        })?)
    }
}
