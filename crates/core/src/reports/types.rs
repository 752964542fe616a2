//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, JournalEntryId, JournalLineId};

use crate::aggregation::EntrySelection;
use crate::ledger::{Account, AccountType, CashFlowCategory};

/// Code of the synthetic retained earnings line.
pub const RETAINED_EARNINGS_CODE: &str = "RE";

/// Name of the synthetic retained earnings line.
pub const RETAINED_EARNINGS_NAME: &str = "Retained Earnings";

/// Account identity as shown on a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
}

impl From<&Account> for AccountRef {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
        }
    }
}

/// One row of the trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceLine {
    /// Account.
    #[serde(flatten)]
    pub account: AccountRef,
    /// Debit column.
    pub debit: Decimal,
    /// Credit column.
    pub credit: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Report type identifier.
    pub report_type: String,
    /// As of date.
    pub as_of: NaiveDate,
    /// Accounts with nonzero movement, by code.
    pub accounts: Vec<TrialBalanceLine>,
    /// Total of the debit column.
    pub total_debit: Decimal,
    /// Total of the credit column.
    pub total_credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

/// An account line on a statement. Synthetic lines have no account id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Account ID.
    pub account_id: Option<AccountId>,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Amount shown.
    pub amount: Decimal,
}

impl StatementLine {
    pub(crate) fn for_account(account: &Account, amount: Decimal) -> Self {
        Self {
            account_id: Some(account.id),
            code: account.code.clone(),
            name: account.name.clone(),
            amount,
        }
    }
}

/// Income statement report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Report type identifier.
    pub report_type: String,
    /// Period start date.
    pub start_date: NaiveDate,
    /// Period end date.
    pub end_date: NaiveDate,
    /// Revenue accounts.
    pub revenues: Vec<StatementLine>,
    /// Total revenue.
    pub total_revenue: Decimal,
    /// Expense accounts.
    pub expenses: Vec<StatementLine>,
    /// Total expense.
    pub total_expense: Decimal,
    /// Revenue minus expense.
    pub net_income: Decimal,
}

/// Balance sheet report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Report type identifier.
    pub report_type: String,
    /// As of date.
    pub as_of: NaiveDate,
    /// Asset accounts.
    pub assets: Vec<StatementLine>,
    /// Total assets.
    pub total_assets: Decimal,
    /// Liability accounts.
    pub liabilities: Vec<StatementLine>,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Equity accounts, ending with retained earnings when nonzero.
    pub equity: Vec<StatementLine>,
    /// Total equity including retained earnings.
    pub total_equity: Decimal,
    /// Cumulative revenue minus expense through the as-of date.
    pub retained_earnings: Decimal,
    /// Liabilities plus equity.
    pub total_liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity. Diagnostic only.
    pub is_balanced: bool,
}

/// How a cash activity was categorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategorySource {
    /// Explicit tag on the journal line.
    Tagged,
    /// Keyword match on the description.
    Keyword,
}

/// A single movement of the cash account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashActivity {
    /// Source journal.
    pub journal_id: JournalEntryId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Line description, or the entry's when the line has none.
    pub description: String,
    /// Debit minus credit on the cash account.
    pub amount: Decimal,
    /// Section the activity was placed in.
    pub category: CashFlowCategory,
    /// How the section was decided.
    pub source: CategorySource,
}

/// One section of the cash flow statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowSection {
    /// Activities in chronological order.
    pub activities: Vec<CashActivity>,
    /// Sum of the activity amounts.
    pub total: Decimal,
}

impl CashFlowSection {
    pub(crate) fn push(&mut self, activity: CashActivity) {
        self.total += activity.amount;
        self.activities.push(activity);
    }
}

/// Cash flow statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowReport {
    /// Report type identifier.
    pub report_type: String,
    /// Period start date.
    pub start_date: NaiveDate,
    /// Period end date.
    pub end_date: NaiveDate,
    /// The account treated as cash, if one could be resolved.
    pub cash_account: Option<AccountRef>,
    /// Operating activities.
    pub operating: CashFlowSection,
    /// Investing activities.
    pub investing: CashFlowSection,
    /// Financing activities.
    pub financing: CashFlowSection,
    /// Sum of the three sections.
    pub net_cash_flow: Decimal,
}

/// One posted line on an account ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    /// Source journal.
    pub journal_id: JournalEntryId,
    /// Source line.
    pub line_id: JournalLineId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Line description, or the entry's when the line has none.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Running debit-minus-credit balance after this line.
    pub balance: Decimal,
}

/// Account ledger report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLedgerReport {
    /// Report type identifier.
    pub report_type: String,
    /// Account.
    pub account: AccountRef,
    /// Period start date.
    pub start_date: NaiveDate,
    /// Period end date.
    pub end_date: NaiveDate,
    /// Lines in chronological order.
    pub transactions: Vec<LedgerTransaction>,
    /// Running balance after the last line.
    pub ending_balance: Decimal,
}

/// Movement totals by account type over a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Entries summarized.
    pub selection: EntrySelection,
    /// Asset movement.
    pub assets: Decimal,
    /// Liability movement.
    pub liabilities: Decimal,
    /// Equity movement plus revenue minus expense.
    pub equity: Decimal,
    /// Revenue movement.
    pub revenue: Decimal,
    /// Expense movement.
    pub expenses: Decimal,
    /// Whether assets equal liabilities plus equity.
    pub equation_ok: bool,
}
