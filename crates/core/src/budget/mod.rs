//! Budget tracking and variance analysis.

pub mod error;
pub mod service;
pub mod types;
pub mod variance;

#[cfg(test)]
mod tests;

pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{
    Budget, BudgetLine, BudgetLineInput, BudgetPeriod, BudgetStatus, BudgetType,
    CreateBudgetInput, LineVariance, UpdateBudgetInput, VarianceReport, VarianceResult,
    VarianceStatus, VarianceSummary,
};
pub use variance::{actual_amount, calculate_variance, variance_report};
