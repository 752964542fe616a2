//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Well-known account codes used by posting workflows.
    #[serde(default)]
    pub accounts: AccountCodes,
    /// Name fragment identifying the cash account when no account carries the cash code.
    #[serde(default = "default_cash_keyword")]
    pub cash_keyword: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            accounts: AccountCodes::default(),
            cash_keyword: default_cash_keyword(),
        }
    }
}

fn default_cash_keyword() -> String {
    "cash".to_string()
}

/// Account codes of the control accounts that workflows post against.
///
/// Workflows create these accounts on demand the first time they need them.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountCodes {
    /// Cash and bank.
    #[serde(default = "default_cash")]
    pub cash: String,
    /// Accounts receivable control account.
    #[serde(default = "default_receivables_control")]
    pub receivables_control: String,
    /// Prefix for per-asset fixed asset accounts.
    #[serde(default = "default_fixed_asset_prefix")]
    pub fixed_asset_prefix: String,
    /// Accumulated depreciation (contra asset).
    #[serde(default = "default_accumulated_depreciation")]
    pub accumulated_depreciation: String,
    /// Accounts payable control account.
    #[serde(default = "default_payables_control")]
    pub payables_control: String,
    /// Sales revenue.
    #[serde(default = "default_sales_revenue")]
    pub sales_revenue: String,
    /// Operating expenses.
    #[serde(default = "default_operating_expenses")]
    pub operating_expenses: String,
    /// Depreciation expense.
    #[serde(default = "default_depreciation_expense")]
    pub depreciation_expense: String,
    /// Loss on asset disposal.
    #[serde(default = "default_loss_on_disposal")]
    pub loss_on_disposal: String,
    /// Gain on asset disposal.
    #[serde(default = "default_gain_on_disposal")]
    pub gain_on_disposal: String,
}

impl Default for AccountCodes {
    fn default() -> Self {
        Self {
            cash: default_cash(),
            receivables_control: default_receivables_control(),
            fixed_asset_prefix: default_fixed_asset_prefix(),
            accumulated_depreciation: default_accumulated_depreciation(),
            payables_control: default_payables_control(),
            sales_revenue: default_sales_revenue(),
            operating_expenses: default_operating_expenses(),
            depreciation_expense: default_depreciation_expense(),
            loss_on_disposal: default_loss_on_disposal(),
            gain_on_disposal: default_gain_on_disposal(),
        }
    }
}

fn default_cash() -> String {
    "1000".to_string()
}

fn default_receivables_control() -> String {
    "1200".to_string()
}

fn default_fixed_asset_prefix() -> String {
    "1500".to_string()
}

fn default_accumulated_depreciation() -> String {
    "1590".to_string()
}

fn default_payables_control() -> String {
    "2100".to_string()
}

fn default_sales_revenue() -> String {
    "4000".to_string()
}

fn default_operating_expenses() -> String {
    "5000".to_string()
}

fn default_depreciation_expense() -> String {
    "6000".to_string()
}

fn default_loss_on_disposal() -> String {
    "6500".to_string()
}

fn default_gain_on_disposal() -> String {
    "7000".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "tally=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones: `config/default`,
    /// `config/{RUN_MODE}`, then `TALLY__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
