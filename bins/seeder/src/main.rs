//! Demo data seeder for Tally.
//!
//! Seeds a small chart of accounts, runs each workflow once (capital
//! injection, receivables, payables, a fixed asset, a budget, a bank
//! statement import), then prints every report as JSON.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tally_core::assets::{AssetCategory, CreateAssetInput, DepreciationMethod};
use tally_core::budget::{BudgetLineInput, BudgetPeriod, BudgetType, CreateBudgetInput};
use tally_core::fiscal::PeriodLabel;
use tally_core::invoicing::{
    CreateApInvoiceInput, CreateArInvoiceInput, InvoiceItemInput, RecordPaymentInput,
};
use tally_core::ledger::{
    AccountType, CashFlowCategory, CreateJournalInput, JournalLineInput, NewAccount,
};
use tally_core::reconciliation::NewReconItem;
use tally_db::{
    AccountRepository, BudgetRepository, Database, FixedAssetRepository, InvoiceRepository,
    JournalRepository, ReconciliationRepository, ReportRepository,
};
use tally_shared::AppConfig;

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let db = Database::new();
    let codes = config.ledger.accounts.clone();
    let accounts = AccountRepository::new(db.clone());
    let journals = JournalRepository::new(db.clone());
    let invoices = InvoiceRepository::new(db.clone(), codes.clone());
    let assets = FixedAssetRepository::new(db.clone(), codes.clone());
    let budgets = BudgetRepository::new(db.clone());
    let recon = ReconciliationRepository::new(db.clone());
    let reports = ReportRepository::new(db, config.ledger.clone());

    info!("Seeding chart of accounts");
    let cash = accounts.create_account(NewAccount::new(
        &codes.cash,
        "Cash and Bank",
        AccountType::Asset,
    ))?;
    let equity = accounts.create_account(NewAccount::new(
        "3000",
        "Owner's Capital",
        AccountType::Equity,
    ))?;
    let revenue = accounts.create_account(NewAccount::new(
        &codes.sales_revenue,
        "Sales Revenue",
        AccountType::Revenue,
    ))?;
    let expenses = accounts.create_account(NewAccount::new(
        &codes.operating_expenses,
        "Operating Expenses",
        AccountType::Expense,
    ))?;

    info!("Seeding capital injection");
    let capital = journals.create(CreateJournalInput {
        date: date(2024, 1, 2)?,
        period: None,
        description: "Owner capital contribution".to_string(),
        reference: Some("CAP-001".to_string()),
        lines: vec![
            JournalLineInput::debit(cash.id, dec!(50000.00))
                .with_category(CashFlowCategory::Financing),
            JournalLineInput::credit(equity.id, dec!(50000.00)),
        ],
    })?;
    journals.submit_for_approval(capital.id)?;
    journals.post(capital.id)?;

    info!("Seeding receivables");
    let acme = invoices.open_customer("Acme Corp")?;
    let sale = invoices.create_ar_invoice(CreateArInvoiceInput {
        invoice_number: "INV-1001".to_string(),
        customer: acme,
        invoice_date: date(2024, 2, 5)?,
        due_date: Some(date(2024, 3, 6)?),
        amount: None,
        items: vec![InvoiceItemInput {
            description: "Implementation services".to_string(),
            quantity: dec!(40),
            unit_price: dec!(125.00),
        }],
        tax_amount: dec!(500.00),
        discount_amount: dec!(0),
        description: None,
    })?;
    invoices.record_ar_payment(
        sale.invoice.id,
        RecordPaymentInput {
            payment_date: date(2024, 2, 20)?,
            amount: dec!(3000.00),
            payment_method: Some("Bank transfer".to_string()),
            reference: Some("WIRE-7781".to_string()),
        },
    )?;

    info!("Seeding payables");
    let supplier = invoices.open_vendor("Office Supplies Ltd")?;
    let bill = invoices.create_ap_invoice(CreateApInvoiceInput {
        invoice_number: "BILL-2001".to_string(),
        vendor: supplier,
        invoice_date: date(2024, 2, 10)?,
        due_date: Some(date(2024, 3, 10)?),
        amount: dec!(650.00),
        description: Some("Stationery".to_string()),
    })?;
    invoices.pay_ap_invoice(bill.invoice.id, date(2024, 2, 28)?)?;

    info!("Seeding fixed asset");
    let press = assets.create_asset(CreateAssetInput {
        asset_name: "Laser cutter".to_string(),
        asset_code: None,
        category: AssetCategory::Equipment,
        purchase_date: date(2024, 1, 15)?,
        purchase_cost: dec!(12000.00),
        salvage_value: dec!(0),
        useful_life_years: 10,
        depreciation_method: DepreciationMethod::StraightLine,
        total_estimated_units: None,
        location: Some("Workshop".to_string()),
        description: None,
    })?;
    for month_end in [date(2024, 1, 31)?, date(2024, 2, 29)?, date(2024, 3, 31)?] {
        assets.record_depreciation(press.asset.id, month_end, None)?;
    }

    info!("Seeding budget");
    let q1 = budgets.create_budget(
        CreateBudgetInput {
            name: "Q1 2024 Operating".to_string(),
            description: None,
            fiscal_year: 2024,
            period: BudgetPeriod::Quarterly,
            budget_type: BudgetType::Operating,
            start_date: date(2024, 1, 1)?,
            end_date: date(2024, 3, 31)?,
            notes: None,
            lines: vec![
                BudgetLineInput::new(revenue.id, dec!(6000.00)),
                BudgetLineInput::new(expenses.id, dec!(500.00)),
            ],
        },
        date(2023, 12, 15)?,
    )?;
    budgets.submit(q1.id)?;
    budgets.approve(q1.id, "controller", date(2023, 12, 20)?)?;
    budgets.activate(q1.id)?;

    info!("Seeding bank statement");
    recon.import(vec![
        NewReconItem {
            date: date(2024, 2, 21)?,
            amount: dec!(3000.00),
            reference: Some("WIRE-7781".to_string()),
        },
        NewReconItem {
            date: date(2024, 2, 27)?,
            amount: dec!(650.00),
            reference: Some("CHQ-0042".to_string()),
        },
    ])?;

    let q1_start = date(2024, 1, 1)?;
    let q1_end = date(2024, 3, 31)?;
    let february = PeriodLabel::parse("2024-02")?;

    print_json("Trial balance", &reports.trial_balance(q1_end)?)?;
    print_json("Income statement", &reports.income_statement(q1_start, q1_end)?)?;
    print_json("Balance sheet", &reports.balance_sheet(q1_end)?)?;
    print_json("Cash flow", &reports.cash_flow(q1_start, q1_end)?)?;
    print_json("Cash ledger", &reports.account_ledger(cash.id, q1_start, q1_end)?)?;
    print_json("February summary", &reports.period_summary(&february)?)?;
    print_json("Budget variance", &budgets.variance_report(q1.id)?)?;
    print_json("Depreciation schedule", &assets.schedule(press.asset.id, 6)?)?;
    print_json("Match suggestions", &recon.suggest_matches(&february)?)?;

    info!("Seeding complete");
    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("invalid date {year}-{month}-{day}"))
}

fn print_json<T: Serialize>(title: &str, value: &T) -> anyhow::Result<()> {
    println!("=== {title} ===");
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
