//! Periodic depreciation.
//!
//! Amounts are monthly. Straight-line and declining-balance follow the
//! annual figure divided by twelve, each step rounded half-up to cents
//! (the declining rate to four places). Every charge is capped so book
//! value never drops below salvage value.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, FixedAssetId, RATE_SCALE, round_half_up, round_money};

use super::error::AssetError;
use super::types::{AssetStatus, DepreciationMethod, FixedAsset};
use crate::ledger::JournalLineInput;

const MONTHS_PER_YEAR: u32 = 12;

/// Outcome of one depreciation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationCharge {
    /// Asset depreciated.
    pub asset_id: FixedAssetId,
    /// Date of the charge.
    pub date: NaiveDate,
    /// Amount charged; zero when nothing was left to depreciate.
    pub amount: Decimal,
    /// Accumulated depreciation after the charge.
    pub accumulated_depreciation: Decimal,
    /// Net book value after the charge.
    pub net_book_value: Decimal,
    /// Asset status after the charge.
    pub status: AssetStatus,
}

/// One month of a projected schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Month number, starting at 1.
    pub period: u32,
    /// Charge for the month.
    pub amount: Decimal,
    /// Accumulated depreciation after the month.
    pub accumulated_depreciation: Decimal,
    /// Net book value after the month.
    pub net_book_value: Decimal,
}

/// Stateless depreciation engine.
pub struct DepreciationEngine;

impl DepreciationEngine {
    /// Uncapped monthly amount under the asset's method.
    ///
    /// Declining balance uses the current accumulated depreciation, so its
    /// result changes after every recorded charge.
    ///
    /// # Errors
    ///
    /// `InvalidUsefulLife` for a zero useful life; `MissingUnits` or
    /// `NegativeAmount` for units of production.
    pub fn periodic_amount(
        asset: &FixedAsset,
        units_this_period: Option<Decimal>,
    ) -> Result<Decimal, AssetError> {
        if asset.useful_life_years == 0 {
            return Err(AssetError::InvalidUsefulLife);
        }
        let years = Decimal::from(asset.useful_life_years);
        let months = Decimal::from(MONTHS_PER_YEAR);

        match asset.depreciation_method {
            DepreciationMethod::StraightLine => {
                let annual = round_money((asset.purchase_cost - asset.salvage_value) / years);
                Ok(round_money(annual / months))
            }
            DepreciationMethod::DecliningBalance => {
                let rate = round_half_up(Decimal::TWO / years, RATE_SCALE);
                let annual = asset.net_book_value() * rate;
                Ok(round_money(annual / months))
            }
            DepreciationMethod::UnitsOfProduction => {
                let (Some(units), Some(total)) = (units_this_period, asset.total_estimated_units)
                else {
                    return Err(AssetError::MissingUnits);
                };
                if units < Decimal::ZERO {
                    return Err(AssetError::NegativeAmount);
                }
                if total <= Decimal::ZERO {
                    return Err(AssetError::MissingUnits);
                }
                Ok(round_money(
                    (asset.purchase_cost - asset.salvage_value) * units / total,
                ))
            }
        }
    }

    /// Monthly amount capped at the remaining depreciable amount.
    ///
    /// # Errors
    ///
    /// As for [`Self::periodic_amount`].
    pub fn period_charge(
        asset: &FixedAsset,
        units_this_period: Option<Decimal>,
    ) -> Result<Decimal, AssetError> {
        let amount = Self::periodic_amount(asset, units_this_period)?;
        Ok(amount.min(asset.remaining_depreciable()).max(Decimal::ZERO))
    }

    /// Records one period of depreciation on an ACTIVE asset and flips it to
    /// FULLY_DEPRECIATED once book value reaches salvage value.
    ///
    /// # Errors
    ///
    /// `NotActive` for disposed or fully depreciated assets; otherwise as
    /// for [`Self::periodic_amount`].
    pub fn record(
        asset: &mut FixedAsset,
        date: NaiveDate,
        units_this_period: Option<Decimal>,
    ) -> Result<DepreciationCharge, AssetError> {
        if asset.status != AssetStatus::Active {
            return Err(AssetError::NotActive(asset.status));
        }
        let amount = Self::period_charge(asset, units_this_period)?;

        asset.accumulated_depreciation += amount;
        if asset.net_book_value() <= asset.salvage_value {
            asset.status = AssetStatus::FullyDepreciated;
        }

        Ok(DepreciationCharge {
            asset_id: asset.id,
            date,
            amount,
            accumulated_depreciation: asset.accumulated_depreciation,
            net_book_value: asset.net_book_value(),
            status: asset.status,
        })
    }

    /// Projects up to `months` charges from the asset's current state,
    /// stopping early once it is fully depreciated.
    ///
    /// Units of production has no projection without per-period usage.
    ///
    /// # Errors
    ///
    /// As for [`Self::record`].
    pub fn schedule(asset: &FixedAsset, months: u32) -> Result<Vec<ScheduleRow>, AssetError> {
        let mut projected = asset.clone();
        let mut rows = Vec::new();
        for period in 1..=months {
            if projected.status != AssetStatus::Active {
                break;
            }
            let charge = Self::record(&mut projected, asset.purchase_date, None)?;
            rows.push(ScheduleRow {
                period,
                amount: charge.amount,
                accumulated_depreciation: charge.accumulated_depreciation,
                net_book_value: charge.net_book_value,
            });
        }
        Ok(rows)
    }

    /// Journal lines for a depreciation charge: debit expense, credit
    /// accumulated depreciation.
    #[must_use]
    pub fn journal_lines(
        asset: &FixedAsset,
        amount: Decimal,
        expense_account: AccountId,
        accumulated_account: AccountId,
    ) -> Vec<JournalLineInput> {
        vec![
            JournalLineInput::debit(expense_account, amount)
                .with_description(format!("Depreciation: {}", asset.asset_name)),
            JournalLineInput::credit(accumulated_account, amount)
                .with_description(format!("Accumulated Depreciation: {}", asset.asset_name)),
        ]
    }

    /// Journal lines for the purchase: debit the asset account, credit cash.
    #[must_use]
    pub fn purchase_lines(asset: &FixedAsset, cash_account: AccountId) -> Vec<JournalLineInput> {
        vec![
            JournalLineInput::debit(asset.account_id, asset.purchase_cost)
                .with_description(format!("Purchase of {}", asset.asset_name)),
            JournalLineInput::credit(cash_account, asset.purchase_cost)
                .with_description(format!("Payment for {}", asset.asset_name))
                .with_category(crate::ledger::CashFlowCategory::Investing),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::types::{AssetCategory, CreateAssetInput};
    use rust_decimal_macros::dec;

    fn asset(
        method: DepreciationMethod,
        cost: Decimal,
        salvage: Decimal,
        years: u32,
    ) -> FixedAsset {
        FixedAsset::register(
            CreateAssetInput {
                asset_name: "Press".to_string(),
                asset_code: None,
                category: AssetCategory::Machinery,
                purchase_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                purchase_cost: cost,
                salvage_value: salvage,
                useful_life_years: years,
                depreciation_method: method,
                total_estimated_units: Some(dec!(10000)),
                location: None,
                description: None,
            },
            "MAC-1".to_string(),
            AccountId::new(),
        )
        .unwrap()
    }

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_straight_line_monthly() {
        let a = asset(DepreciationMethod::StraightLine, dec!(12000.00), dec!(0), 10);
        assert_eq!(
            DepreciationEngine::periodic_amount(&a, None).unwrap(),
            dec!(100.00)
        );
    }

    #[test]
    fn test_straight_line_rounds_twice() {
        // annual 3333.33, monthly 277.7775 -> 277.78
        let a = asset(DepreciationMethod::StraightLine, dec!(10000), dec!(0), 3);
        assert_eq!(
            DepreciationEngine::periodic_amount(&a, None).unwrap(),
            dec!(277.78)
        );
    }

    #[test]
    fn test_declining_balance_uses_current_book_value() {
        let mut a = asset(DepreciationMethod::DecliningBalance, dec!(12000), dec!(0), 5);
        // rate 0.4, annual 4800, monthly 400
        let first = DepreciationEngine::record(&mut a, jan(31), None).unwrap();
        assert_eq!(first.amount, dec!(400.00));
        // book value 11600 -> annual 4640, monthly 386.67
        let second = DepreciationEngine::record(&mut a, jan(31), None).unwrap();
        assert_eq!(second.amount, dec!(386.67));
        assert_eq!(a.accumulated_depreciation, dec!(786.67));
    }

    #[test]
    fn test_declining_rate_rounded_to_four_places() {
        // 2/3 -> 0.6667; 9000 * 0.6667 / 12 = 500.025 -> 500.03
        let a = asset(DepreciationMethod::DecliningBalance, dec!(9000), dec!(0), 3);
        assert_eq!(
            DepreciationEngine::periodic_amount(&a, None).unwrap(),
            dec!(500.03)
        );
    }

    #[test]
    fn test_units_of_production() {
        let a = asset(DepreciationMethod::UnitsOfProduction, dec!(11000), dec!(1000), 5);
        assert_eq!(
            DepreciationEngine::periodic_amount(&a, Some(dec!(250))).unwrap(),
            dec!(250.00)
        );
        assert!(matches!(
            DepreciationEngine::periodic_amount(&a, None),
            Err(AssetError::MissingUnits)
        ));
    }

    #[test]
    fn test_charge_capped_at_salvage() {
        let mut a = asset(DepreciationMethod::StraightLine, dec!(1200), dec!(200), 1);
        a.accumulated_depreciation = dec!(950);
        let charge = DepreciationEngine::record(&mut a, jan(31), None).unwrap();

        assert_eq!(charge.amount, dec!(50));
        assert_eq!(charge.net_book_value, dec!(200));
        assert_eq!(charge.status, AssetStatus::FullyDepreciated);
    }

    #[test]
    fn test_record_rejects_inactive_asset() {
        let mut a = asset(DepreciationMethod::StraightLine, dec!(1200), dec!(0), 1);
        a.status = AssetStatus::Disposed;
        assert!(matches!(
            DepreciationEngine::record(&mut a, jan(31), None),
            Err(AssetError::NotActive(AssetStatus::Disposed))
        ));
    }

    #[test]
    fn test_twelve_months_scenario() {
        let mut a = asset(DepreciationMethod::StraightLine, dec!(12000.00), dec!(0), 10);
        for _ in 0..12 {
            DepreciationEngine::record(&mut a, jan(31), None).unwrap();
        }
        assert_eq!(a.accumulated_depreciation, dec!(1200.00));
        assert_eq!(a.status, AssetStatus::Active);
    }

    #[test]
    fn test_schedule_stops_when_fully_depreciated() {
        let a = asset(DepreciationMethod::StraightLine, dec!(1200), dec!(0), 1);
        let rows = DepreciationEngine::schedule(&a, 24).unwrap();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[11].net_book_value, Decimal::ZERO);
        assert_eq!(a.accumulated_depreciation, Decimal::ZERO);
    }

    #[test]
    fn test_register_validates_terms() {
        let input = |years: u32, salvage: Decimal| CreateAssetInput {
            asset_name: "Desk".to_string(),
            asset_code: None,
            category: AssetCategory::Furniture,
            purchase_date: jan(1),
            purchase_cost: dec!(500),
            salvage_value: salvage,
            useful_life_years: years,
            depreciation_method: DepreciationMethod::StraightLine,
            total_estimated_units: None,
            location: None,
            description: None,
        };
        assert!(matches!(
            FixedAsset::register(input(0, dec!(0)), "FUR-1".into(), AccountId::new()),
            Err(AssetError::InvalidUsefulLife)
        ));
        assert!(matches!(
            FixedAsset::register(input(5, dec!(600)), "FUR-1".into(), AccountId::new()),
            Err(AssetError::SalvageExceedsCost { .. })
        ));
    }

    #[test]
    fn test_journal_lines_balance() {
        let a = asset(DepreciationMethod::StraightLine, dec!(12000), dec!(0), 10);
        let lines =
            DepreciationEngine::journal_lines(&a, dec!(100), AccountId::new(), AccountId::new());
        let debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let credit: Decimal = lines.iter().map(|l| l.credit).sum();
        assert_eq!(debit, credit);
        assert_eq!(lines[0].description.as_deref(), Some("Depreciation: Press"));
    }
}
