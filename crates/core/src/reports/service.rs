//! Report generation service.
//!
//! Every report is a pure function of the chart and the journal entries
//! handed in; running one twice over the same data yields identical output.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::LedgerConfig;
use tally_shared::types::AccountId;

use super::error::ReportError;
use super::types::{
    AccountLedgerReport, AccountRef, BalanceSheetReport, CashActivity, CashFlowReport,
    CashFlowSection, CategorySource, IncomeStatementReport, LedgerTransaction, PeriodSummary,
    RETAINED_EARNINGS_CODE, RETAINED_EARNINGS_NAME, StatementLine, TrialBalanceLine,
    TrialBalanceReport,
};
use crate::aggregation::{AggregationEngine, DateWindow, EntrySelection, MovementMap};
use crate::ledger::{AccountType, CashFlowCategory, ChartOfAccounts, JournalEntry, NormalBalance};

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates the trial balance as of a date.
    ///
    /// Each account with nonzero movement lands in the debit column when its
    /// movement follows a debit-normal polarity, otherwise in the credit
    /// column.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if a posted line references an unknown account.
    pub fn trial_balance(
        chart: &ChartOfAccounts,
        entries: &[JournalEntry],
        as_of: NaiveDate,
    ) -> Result<TrialBalanceReport, ReportError> {
        let movements = Self::movements_through(chart, entries, as_of)?;

        let mut accounts = Vec::new();
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;

        for account in chart.sorted_by_code() {
            let net = AggregationEngine::net_of(&movements, account.id);
            if net.is_zero() {
                continue;
            }
            let debit_normal = account.account_type.normal_balance() == NormalBalance::Debit;
            let on_debit_side = debit_normal == net.is_sign_positive();
            let (debit, credit) = if on_debit_side {
                (net.abs(), Decimal::ZERO)
            } else {
                (Decimal::ZERO, net.abs())
            };
            total_debit += debit;
            total_credit += credit;
            accounts.push(TrialBalanceLine {
                account: AccountRef::from(account),
                debit,
                credit,
            });
        }

        Ok(TrialBalanceReport {
            report_type: "trial_balance".to_string(),
            as_of,
            accounts,
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        })
    }

    /// Generates the income statement for `[start, end]`.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` if `start > end`; `AccountNotFound` as above.
    pub fn income_statement(
        chart: &ChartOfAccounts,
        entries: &[JournalEntry],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<IncomeStatementReport, ReportError> {
        let window = DateWindow::new(start, end)?;
        let movements = AggregationEngine::movements(chart, entries, &window.into())?;

        let (revenues, total_revenue) =
            Self::statement_lines(chart, &movements, AccountType::Revenue, |net| net.abs());
        let (expenses, total_expense) =
            Self::statement_lines(chart, &movements, AccountType::Expense, |net| net.abs());

        Ok(IncomeStatementReport {
            report_type: "income_statement".to_string(),
            start_date: start,
            end_date: end,
            revenues,
            total_revenue,
            expenses,
            total_expense,
            net_income: total_revenue - total_expense,
        })
    }

    /// Generates the balance sheet as of a date.
    ///
    /// Amounts are signed normal-balance balances. Retained earnings is
    /// cumulative revenue minus expense through `as_of`, appended to equity
    /// as a synthetic line when nonzero. `is_balanced` is reported, not
    /// enforced.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if a posted line references an unknown account.
    pub fn balance_sheet(
        chart: &ChartOfAccounts,
        entries: &[JournalEntry],
        as_of: NaiveDate,
    ) -> Result<BalanceSheetReport, ReportError> {
        let movements = Self::movements_through(chart, entries, as_of)?;
        let signed = |net: Decimal| net;

        let (assets, total_assets) =
            Self::statement_lines(chart, &movements, AccountType::Asset, signed);
        let (liabilities, total_liabilities) =
            Self::statement_lines(chart, &movements, AccountType::Liability, signed);
        let (mut equity, mut total_equity) =
            Self::statement_lines(chart, &movements, AccountType::Equity, signed);

        let retained_earnings = Self::type_total(&movements, AccountType::Revenue)
            - Self::type_total(&movements, AccountType::Expense);
        if !retained_earnings.is_zero() {
            equity.push(StatementLine {
                account_id: None,
                code: RETAINED_EARNINGS_CODE.to_string(),
                name: RETAINED_EARNINGS_NAME.to_string(),
                amount: retained_earnings,
            });
            total_equity += retained_earnings;
        }

        let total_liabilities_and_equity = total_liabilities + total_equity;

        Ok(BalanceSheetReport {
            report_type: "balance_sheet".to_string(),
            as_of,
            assets,
            total_assets,
            liabilities,
            total_liabilities,
            equity,
            total_equity,
            retained_earnings,
            total_liabilities_and_equity,
            is_balanced: total_assets == total_liabilities_and_equity,
        })
    }

    /// Generates the cash flow statement for `[start, end]`.
    ///
    /// The cash account is the one carrying the configured cash code, else
    /// the first account whose name contains the cash keyword. Each cash
    /// line is placed by its explicit category tag, falling back to a
    /// keyword match on its description. Without a cash account every
    /// section is empty.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` if `start > end`.
    pub fn cash_flow(
        chart: &ChartOfAccounts,
        entries: &[JournalEntry],
        start: NaiveDate,
        end: NaiveDate,
        config: &LedgerConfig,
    ) -> Result<CashFlowReport, ReportError> {
        let window = DateWindow::new(start, end)?;
        let cash_account = chart
            .find_by_code_or_name(&config.accounts.cash, &config.cash_keyword)
            .map(AccountRef::from);

        let mut operating = CashFlowSection::default();
        let mut investing = CashFlowSection::default();
        let mut financing = CashFlowSection::default();

        if let Some(cash) = &cash_account {
            for entry in AggregationEngine::select(entries, &window.into()) {
                for line in entry.lines.iter().filter(|l| l.account_id == cash.account_id) {
                    let description = entry.line_description(line).to_string();
                    let (category, source) = match line.cash_flow_category {
                        Some(category) => (category, CategorySource::Tagged),
                        None => (
                            CashFlowCategory::from_description(&description),
                            CategorySource::Keyword,
                        ),
                    };
                    let activity = CashActivity {
                        journal_id: entry.id,
                        date: entry.date,
                        description,
                        amount: line.raw_movement(),
                        category,
                        source,
                    };
                    match category {
                        CashFlowCategory::Operating => operating.push(activity),
                        CashFlowCategory::Investing => investing.push(activity),
                        CashFlowCategory::Financing => financing.push(activity),
                    }
                }
            }
        }

        let net_cash_flow = operating.total + investing.total + financing.total;

        Ok(CashFlowReport {
            report_type: "cash_flow".to_string(),
            start_date: start,
            end_date: end,
            cash_account,
            operating,
            investing,
            financing,
            net_cash_flow,
        })
    }

    /// Lists every posted line touching an account within `[start, end]`,
    /// with a raw debit-minus-credit running balance starting from zero.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` for an unknown account, `InvalidDateRange` if
    /// `start > end`.
    pub fn account_ledger(
        chart: &ChartOfAccounts,
        entries: &[JournalEntry],
        account_id: AccountId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AccountLedgerReport, ReportError> {
        let account = chart.require(account_id)?;
        let window = DateWindow::new(start, end)?;

        let mut running = Decimal::ZERO;
        let mut transactions = Vec::new();
        for entry in AggregationEngine::select(entries, &window.into()) {
            for line in entry.lines.iter().filter(|l| l.account_id == account_id) {
                running += line.raw_movement();
                transactions.push(LedgerTransaction {
                    journal_id: entry.id,
                    line_id: line.id,
                    date: entry.date,
                    description: entry.line_description(line).to_string(),
                    debit: line.debit,
                    credit: line.credit,
                    balance: running,
                });
            }
        }

        Ok(AccountLedgerReport {
            report_type: "account_ledger".to_string(),
            account: AccountRef::from(account),
            start_date: start,
            end_date: end,
            transactions,
            ending_balance: running,
        })
    }

    /// Summarizes movement by account type over a period or date window.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if a posted line references an unknown account.
    pub fn period_summary(
        chart: &ChartOfAccounts,
        entries: &[JournalEntry],
        selection: &EntrySelection,
    ) -> Result<PeriodSummary, ReportError> {
        let movements = AggregationEngine::movements(chart, entries, selection)?;

        let assets = Self::type_total(&movements, AccountType::Asset);
        let liabilities = Self::type_total(&movements, AccountType::Liability);
        let revenue = Self::type_total(&movements, AccountType::Revenue);
        let expenses = Self::type_total(&movements, AccountType::Expense);
        let equity = Self::type_total(&movements, AccountType::Equity) + revenue - expenses;

        Ok(PeriodSummary {
            selection: selection.clone(),
            assets,
            liabilities,
            equity,
            revenue,
            expenses,
            equation_ok: assets == liabilities + equity,
        })
    }

    fn movements_through(
        chart: &ChartOfAccounts,
        entries: &[JournalEntry],
        as_of: NaiveDate,
    ) -> Result<MovementMap, ReportError> {
        let selection = EntrySelection::Dates(DateWindow::through(as_of));
        Ok(AggregationEngine::movements(chart, entries, &selection)?)
    }

    fn statement_lines<F>(
        chart: &ChartOfAccounts,
        movements: &MovementMap,
        account_type: AccountType,
        shown: F,
    ) -> (Vec<StatementLine>, Decimal)
    where
        F: Fn(Decimal) -> Decimal,
    {
        let mut lines = Vec::new();
        let mut total = Decimal::ZERO;
        for account in chart
            .sorted_by_code()
            .into_iter()
            .filter(|a| a.account_type == account_type)
        {
            let net = AggregationEngine::net_of(movements, account.id);
            if net.is_zero() {
                continue;
            }
            let amount = shown(net);
            total += amount;
            lines.push(StatementLine::for_account(account, amount));
        }
        (lines, total)
    }

    fn type_total(movements: &MovementMap, account_type: AccountType) -> Decimal {
        movements
            .values()
            .filter(|m| m.account_type == account_type)
            .map(|m| m.net)
            .sum()
    }
}
