//! Invoice workflows and their journal entries.
//!
//! Every function here is pure: the caller supplies the chart and runs the
//! returned journal through the posting engine inside one unit of work.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::config::AccountCodes;
use tally_shared::types::{AccountId, InvoiceId};

use super::error::InvoiceError;
use super::types::{
    ApInvoice, ArInvoice, Counterparty, CreateApInvoiceInput, CreateArInvoiceInput, InvoiceItem,
    InvoicePayment, InvoiceStatus, RecordPaymentInput,
};
use crate::ledger::{
    AccountType, CashFlowCategory, ChartOfAccounts, CreateJournalInput, JournalLineInput,
    LedgerError,
};

const RECEIVABLES_CONTROL_NAME: &str = "Accounts Receivable - Control";
const PAYABLES_CONTROL_NAME: &str = "Accounts Payable - Control";
const CASH_NAME: &str = "Cash and Bank";
const SALES_REVENUE_NAME: &str = "Sales Revenue";
const OPERATING_EXPENSES_NAME: &str = "Operating Expenses";

/// The two accounts an invoice journal moves money between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceAccounts {
    /// Vendor payable or customer receivable.
    pub counterparty: AccountId,
    /// Expense, revenue, or cash, depending on the workflow.
    pub contra: AccountId,
}

impl InvoiceAccounts {
    /// Payable and operating expense for a vendor bill.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if the vendor's own account is missing.
    pub fn for_ap_invoice(
        chart: &mut ChartOfAccounts,
        codes: &AccountCodes,
        vendor: &Counterparty,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            counterparty: payable_account(chart, codes, vendor)?,
            contra: chart.find_or_create(
                &codes.operating_expenses,
                OPERATING_EXPENSES_NAME,
                AccountType::Expense,
            )?,
        })
    }

    /// Payable and cash for a vendor payment.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if the vendor's own account is missing.
    pub fn for_ap_payment(
        chart: &mut ChartOfAccounts,
        codes: &AccountCodes,
        vendor: &Counterparty,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            counterparty: payable_account(chart, codes, vendor)?,
            contra: chart.find_or_create(&codes.cash, CASH_NAME, AccountType::Asset)?,
        })
    }

    /// Receivable and sales revenue for a customer invoice.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if the customer's own account is missing.
    pub fn for_ar_invoice(
        chart: &mut ChartOfAccounts,
        codes: &AccountCodes,
        customer: &Counterparty,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            counterparty: receivable_account(chart, codes, customer)?,
            contra: chart.find_or_create(
                &codes.sales_revenue,
                SALES_REVENUE_NAME,
                AccountType::Revenue,
            )?,
        })
    }

    /// Receivable and cash for a customer payment.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if the customer's own account is missing.
    pub fn for_ar_payment(
        chart: &mut ChartOfAccounts,
        codes: &AccountCodes,
        customer: &Counterparty,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            counterparty: receivable_account(chart, codes, customer)?,
            contra: chart.find_or_create(&codes.cash, CASH_NAME, AccountType::Asset)?,
        })
    }
}

fn payable_account(
    chart: &mut ChartOfAccounts,
    codes: &AccountCodes,
    vendor: &Counterparty,
) -> Result<AccountId, LedgerError> {
    match vendor.account_id {
        Some(id) => Ok(chart.require(id)?.id),
        None => chart.find_or_create(
            &codes.payables_control,
            PAYABLES_CONTROL_NAME,
            AccountType::Liability,
        ),
    }
}

fn receivable_account(
    chart: &mut ChartOfAccounts,
    codes: &AccountCodes,
    customer: &Counterparty,
) -> Result<AccountId, LedgerError> {
    match customer.account_id {
        Some(id) => Ok(chart.require(id)?.id),
        None => chart.find_or_create(
            &codes.receivables_control,
            RECEIVABLES_CONTROL_NAME,
            AccountType::Asset,
        ),
    }
}

/// Stateless invoice service.
pub struct InvoiceService;

impl InvoiceService {
    /// Opens a vendor sub-ledger account (`AP - name`) under the payables
    /// control account.
    ///
    /// # Errors
    ///
    /// Propagates chart errors.
    pub fn open_vendor_account(
        chart: &mut ChartOfAccounts,
        codes: &AccountCodes,
        name: &str,
    ) -> Result<Counterparty, LedgerError> {
        chart.find_or_create(
            &codes.payables_control,
            PAYABLES_CONTROL_NAME,
            AccountType::Liability,
        )?;
        let account = chart.create_sub_ledger_account(
            &codes.payables_control,
            &format!("AP - {name}"),
            "Accounts Payable",
        )?;
        Ok(Counterparty {
            name: name.to_string(),
            account_id: Some(account.id),
        })
    }

    /// Opens a customer sub-ledger account (`AR - name`) under the
    /// receivables control account.
    ///
    /// # Errors
    ///
    /// Propagates chart errors.
    pub fn open_customer_account(
        chart: &mut ChartOfAccounts,
        codes: &AccountCodes,
        name: &str,
    ) -> Result<Counterparty, LedgerError> {
        chart.find_or_create(
            &codes.receivables_control,
            RECEIVABLES_CONTROL_NAME,
            AccountType::Asset,
        )?;
        let account = chart.create_sub_ledger_account(
            &codes.receivables_control,
            &format!("AR - {name}"),
            "Accounts Receivable",
        )?;
        Ok(Counterparty {
            name: name.to_string(),
            account_id: Some(account.id),
        })
    }

    /// Records a vendor bill.
    ///
    /// # Errors
    ///
    /// `DuplicateInvoiceNumber` when `number_taken` reports the number in
    /// use, `NegativeAmount` for a negative amount.
    pub fn create_ap_invoice<F>(
        input: CreateApInvoiceInput,
        number_taken: F,
    ) -> Result<ApInvoice, InvoiceError>
    where
        F: Fn(&str) -> bool,
    {
        if number_taken(&input.invoice_number) {
            return Err(InvoiceError::DuplicateInvoiceNumber(input.invoice_number));
        }
        if input.amount < Decimal::ZERO {
            return Err(InvoiceError::NegativeAmount);
        }
        Ok(ApInvoice {
            id: InvoiceId::new(),
            invoice_number: input.invoice_number,
            vendor: input.vendor,
            invoice_date: input.invoice_date,
            due_date: input.due_date,
            amount: input.amount,
            description: input.description,
            status: InvoiceStatus::Pending,
            payments: Vec::new(),
        })
    }

    /// Settles a vendor bill in full.
    ///
    /// # Errors
    ///
    /// `AlreadyPaid` if the bill is settled.
    pub fn pay_ap_invoice(
        invoice: &mut ApInvoice,
        payment_date: NaiveDate,
    ) -> Result<InvoicePayment, InvoiceError> {
        if invoice.status == InvoiceStatus::Paid {
            return Err(InvoiceError::AlreadyPaid(invoice.invoice_number.clone()));
        }
        let payment = InvoicePayment {
            payment_date,
            amount: invoice.amount,
            payment_method: Some("System".to_string()),
            reference: Some(format!("Payment-{}", invoice.invoice_number)),
        };
        invoice.status = InvoiceStatus::Paid;
        invoice.payments.push(payment.clone());
        Ok(payment)
    }

    /// Issues a customer invoice, computing the total from its items when
    /// no explicit amount is given.
    ///
    /// # Errors
    ///
    /// `DuplicateInvoiceNumber` or `NegativeAmount`.
    pub fn create_ar_invoice<F>(
        input: CreateArInvoiceInput,
        number_taken: F,
    ) -> Result<ArInvoice, InvoiceError>
    where
        F: Fn(&str) -> bool,
    {
        if number_taken(&input.invoice_number) {
            return Err(InvoiceError::DuplicateInvoiceNumber(input.invoice_number));
        }
        let any_negative = input.tax_amount < Decimal::ZERO
            || input.discount_amount < Decimal::ZERO
            || input.amount.is_some_and(|a| a < Decimal::ZERO)
            || input
                .items
                .iter()
                .any(|i| i.quantity < Decimal::ZERO || i.unit_price < Decimal::ZERO);
        if any_negative {
            return Err(InvoiceError::NegativeAmount);
        }

        let items: Vec<InvoiceItem> = input
            .items
            .into_iter()
            .map(|i| InvoiceItem {
                total: i.quantity * i.unit_price,
                description: i.description,
                quantity: i.quantity,
                unit_price: i.unit_price,
            })
            .collect();
        let subtotal: Decimal = items.iter().map(|i| i.total).sum();
        let amount = match input.amount {
            Some(amount) => amount,
            None => subtotal + input.tax_amount - input.discount_amount,
        };
        if amount < Decimal::ZERO {
            return Err(InvoiceError::NegativeAmount);
        }

        Ok(ArInvoice {
            id: InvoiceId::new(),
            invoice_number: input.invoice_number,
            customer: input.customer,
            invoice_date: input.invoice_date,
            due_date: input.due_date,
            subtotal,
            tax_amount: input.tax_amount,
            discount_amount: input.discount_amount,
            amount,
            balance: amount,
            description: input.description,
            status: InvoiceStatus::Pending,
            items,
            payments: Vec::new(),
        })
    }

    /// Applies a customer payment to the outstanding balance.
    ///
    /// # Errors
    ///
    /// `InvalidPaymentAmount` unless the amount is positive, `Overpayment`
    /// if it exceeds the balance.
    pub fn record_ar_payment(
        invoice: &mut ArInvoice,
        input: RecordPaymentInput,
    ) -> Result<InvoicePayment, InvoiceError> {
        if input.amount <= Decimal::ZERO {
            return Err(InvoiceError::InvalidPaymentAmount(input.amount));
        }
        if input.amount > invoice.balance {
            return Err(InvoiceError::Overpayment {
                balance: invoice.balance,
                amount: input.amount,
            });
        }

        invoice.balance -= input.amount;
        invoice.status = if invoice.balance.is_zero() {
            InvoiceStatus::Paid
        } else {
            InvoiceStatus::PartiallyPaid
        };
        let payment = InvoicePayment {
            payment_date: input.payment_date,
            amount: input.amount,
            payment_method: input.payment_method,
            reference: input.reference,
        };
        invoice.payments.push(payment.clone());
        Ok(payment)
    }

    /// Status after checking the due date; settled invoices are unaffected.
    #[must_use]
    pub fn overdue_status(
        status: InvoiceStatus,
        due_date: Option<NaiveDate>,
        as_of: NaiveDate,
    ) -> InvoiceStatus {
        match (status, due_date) {
            (InvoiceStatus::Pending, Some(due)) if due < as_of => InvoiceStatus::Overdue,
            _ => status,
        }
    }

    /// Debit operating expense, credit the vendor payable.
    #[must_use]
    pub fn ap_invoice_journal(
        invoice: &ApInvoice,
        accounts: InvoiceAccounts,
    ) -> CreateJournalInput {
        let description = format!(
            "AP Invoice: {} - {}",
            invoice.invoice_number, invoice.vendor.name
        );
        journal(
            invoice.invoice_date,
            &description,
            &invoice.invoice_number,
            vec![
                JournalLineInput::debit(accounts.contra, invoice.amount),
                JournalLineInput::credit(accounts.counterparty, invoice.amount),
            ],
        )
    }

    /// Debit the vendor payable, credit cash.
    #[must_use]
    pub fn ap_payment_journal(
        invoice: &ApInvoice,
        payment: &InvoicePayment,
        accounts: InvoiceAccounts,
    ) -> CreateJournalInput {
        let description = format!(
            "AP Payment: {} - {}",
            invoice.invoice_number, invoice.vendor.name
        );
        journal(
            payment.payment_date,
            &description,
            &invoice.invoice_number,
            vec![
                JournalLineInput::debit(accounts.counterparty, payment.amount),
                JournalLineInput::credit(accounts.contra, payment.amount)
                    .with_category(CashFlowCategory::Operating),
            ],
        )
    }

    /// Debit the customer receivable, credit sales revenue.
    #[must_use]
    pub fn ar_invoice_journal(
        invoice: &ArInvoice,
        accounts: InvoiceAccounts,
    ) -> CreateJournalInput {
        let description = format!(
            "AR Invoice: {} - {}",
            invoice.invoice_number, invoice.customer.name
        );
        journal(
            invoice.invoice_date,
            &description,
            &invoice.invoice_number,
            vec![
                JournalLineInput::debit(accounts.counterparty, invoice.amount),
                JournalLineInput::credit(accounts.contra, invoice.amount),
            ],
        )
    }

    /// Debit cash, credit the customer receivable.
    #[must_use]
    pub fn ar_payment_journal(
        invoice: &ArInvoice,
        payment: &InvoicePayment,
        accounts: InvoiceAccounts,
    ) -> CreateJournalInput {
        let description = format!(
            "AR Payment: {} - {}",
            invoice.invoice_number, invoice.customer.name
        );
        journal(
            payment.payment_date,
            &description,
            &invoice.invoice_number,
            vec![
                JournalLineInput::debit(accounts.contra, payment.amount)
                    .with_category(CashFlowCategory::Operating),
                JournalLineInput::credit(accounts.counterparty, payment.amount),
            ],
        )
    }
}

fn journal(
    date: NaiveDate,
    description: &str,
    reference: &str,
    lines: Vec<JournalLineInput>,
) -> CreateJournalInput {
    CreateJournalInput {
        date,
        period: None,
        description: description.to_string(),
        reference: Some(reference.to_string()),
        lines: lines
            .into_iter()
            .map(|l| l.with_description(description))
            .collect(),
    }
}
