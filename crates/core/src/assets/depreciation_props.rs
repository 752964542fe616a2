//! Property-based tests for depreciation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::AccountId;

use super::depreciation::DepreciationEngine;
use super::types::{AssetCategory, AssetStatus, CreateAssetInput, DepreciationMethod, FixedAsset};

fn asset(method: DepreciationMethod, cost: Decimal, salvage: Decimal, years: u32) -> FixedAsset {
    FixedAsset::register(
        CreateAssetInput {
            asset_name: "Generated".to_string(),
            asset_code: None,
            category: AssetCategory::Equipment,
            purchase_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            purchase_cost: cost,
            salvage_value: salvage,
            useful_life_years: years,
            depreciation_method: method,
            total_estimated_units: None,
            location: None,
            description: None,
        },
        "EQU-1".to_string(),
        AccountId::new(),
    )
    .unwrap()
}

fn method() -> impl Strategy<Value = DepreciationMethod> {
    prop_oneof![
        Just(DepreciationMethod::StraightLine),
        Just(DepreciationMethod::DecliningBalance),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Straight-line monthly x 12 x life is within a cent per period of the
    /// depreciable amount.
    #[test]
    fn prop_straight_line_total_close_to_depreciable(
        cost_cents in 100_000i64..100_000_000i64,
        salvage_pct in 0i64..50,
        years in 1u32..40,
    ) {
        let cost = Decimal::new(cost_cents, 2);
        let salvage = (cost * Decimal::new(salvage_pct, 2)).round_dp(2);
        let a = asset(DepreciationMethod::StraightLine, cost, salvage, years);

        let monthly = DepreciationEngine::periodic_amount(&a, None).unwrap();
        let periods = Decimal::from(years * 12);
        let drift = (monthly * periods - (cost - salvage)).abs();

        prop_assert!(
            drift <= Decimal::new(1, 2) * periods,
            "drift {} over {} periods",
            drift,
            periods
        );
    }

    /// Accumulated depreciation only grows and book value never drops below
    /// salvage.
    #[test]
    fn prop_book_value_never_below_salvage(
        method in method(),
        cost_cents in 10_000i64..10_000_000i64,
        salvage_pct in 0i64..50,
        years in 1u32..10,
        runs in 1usize..150,
    ) {
        let cost = Decimal::new(cost_cents, 2);
        let salvage = (cost * Decimal::new(salvage_pct, 2)).round_dp(2);
        let mut a = asset(method, cost, salvage, years);
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        let mut previous = Decimal::ZERO;
        for _ in 0..runs {
            if a.status != AssetStatus::Active {
                break;
            }
            DepreciationEngine::record(&mut a, date, None).unwrap();
            prop_assert!(a.accumulated_depreciation >= previous);
            prop_assert!(a.net_book_value() >= a.salvage_value);
            previous = a.accumulated_depreciation;
        }
    }
}
