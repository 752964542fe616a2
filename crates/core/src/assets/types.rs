//! Fixed asset data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, FixedAssetId};

use super::error::AssetError;

/// Asset category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetCategory {
    /// Buildings.
    Building,
    /// Equipment.
    Equipment,
    /// Furniture and fittings.
    Furniture,
    /// Vehicles.
    Vehicle,
    /// Computers.
    Computer,
    /// Land.
    Land,
    /// Machinery.
    Machinery,
    /// Anything else.
    Other,
}

impl AssetCategory {
    /// Three-letter prefix used in generated asset codes.
    #[must_use]
    pub const fn code_prefix(self) -> &'static str {
        match self {
            Self::Building => "BUI",
            Self::Equipment => "EQU",
            Self::Furniture => "FUR",
            Self::Vehicle => "VEH",
            Self::Computer => "COM",
            Self::Land => "LAN",
            Self::Machinery => "MAC",
            Self::Other => "OTH",
        }
    }
}

/// Depreciation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepreciationMethod {
    /// Equal monthly charge over the useful life.
    StraightLine,
    /// Double-declining balance on current book value.
    DecliningBalance,
    /// Charge proportional to units produced.
    UnitsOfProduction,
}

/// Asset lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    /// In service and depreciating.
    Active,
    /// Sold or scrapped.
    Disposed,
    /// Book value has reached salvage value.
    FullyDepreciated,
}

impl AssetStatus {
    /// Returns the status as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Disposed => "DISPOSED",
            Self::FullyDepreciated => "FULLY_DEPRECIATED",
        }
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedAsset {
    /// Asset ID.
    pub id: FixedAssetId,
    /// Asset name.
    pub asset_name: String,
    /// Unique asset code.
    pub asset_code: String,
    /// Category.
    pub category: AssetCategory,
    /// Purchase date.
    pub purchase_date: NaiveDate,
    /// Purchase cost.
    pub purchase_cost: Decimal,
    /// Residual value at end of life.
    pub salvage_value: Decimal,
    /// Useful life in years.
    pub useful_life_years: u32,
    /// Depreciation method.
    pub depreciation_method: DepreciationMethod,
    /// Total estimated units over the asset's life (units of production).
    pub total_estimated_units: Option<Decimal>,
    /// Depreciation recorded so far.
    pub accumulated_depreciation: Decimal,
    /// Lifecycle status.
    pub status: AssetStatus,
    /// Disposal date.
    pub disposal_date: Option<NaiveDate>,
    /// Disposal proceeds.
    pub disposal_amount: Option<Decimal>,
    /// Location.
    pub location: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Dedicated GL account carrying the asset's cost.
    pub account_id: AccountId,
}

impl FixedAsset {
    /// Cost minus accumulated depreciation.
    #[must_use]
    pub fn net_book_value(&self) -> Decimal {
        self.purchase_cost - self.accumulated_depreciation
    }

    /// Depreciation still available before book value reaches salvage.
    #[must_use]
    pub fn remaining_depreciable(&self) -> Decimal {
        (self.net_book_value() - self.salvage_value).max(Decimal::ZERO)
    }
}

/// Input for registering a fixed asset.
#[derive(Debug, Clone)]
pub struct CreateAssetInput {
    /// Asset name.
    pub asset_name: String,
    /// Asset code; generated from the category when absent.
    pub asset_code: Option<String>,
    /// Category.
    pub category: AssetCategory,
    /// Purchase date.
    pub purchase_date: NaiveDate,
    /// Purchase cost.
    pub purchase_cost: Decimal,
    /// Residual value.
    pub salvage_value: Decimal,
    /// Useful life in years.
    pub useful_life_years: u32,
    /// Depreciation method.
    pub depreciation_method: DepreciationMethod,
    /// Total estimated units (units of production).
    pub total_estimated_units: Option<Decimal>,
    /// Location.
    pub location: Option<String>,
    /// Description.
    pub description: Option<String>,
}

/// Editable asset attributes.
#[derive(Debug, Clone)]
pub struct UpdateAssetInput {
    /// Asset name.
    pub asset_name: String,
    /// Category.
    pub category: AssetCategory,
    /// Location.
    pub location: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Useful life in years.
    pub useful_life_years: u32,
    /// Residual value.
    pub salvage_value: Decimal,
}

impl FixedAsset {
    /// Validates `input` and builds an ACTIVE asset booked to `account_id`.
    ///
    /// # Errors
    ///
    /// `NegativeAmount`, `SalvageExceedsCost`, `InvalidUsefulLife`, or
    /// `MissingUnits` for a units-of-production asset without a total.
    pub fn register(
        input: CreateAssetInput,
        asset_code: String,
        account_id: AccountId,
    ) -> Result<Self, AssetError> {
        Self::validate_terms(
            input.purchase_cost,
            input.salvage_value,
            input.useful_life_years,
        )?;
        if input.depreciation_method == DepreciationMethod::UnitsOfProduction
            && !input.total_estimated_units.is_some_and(|u| u > Decimal::ZERO)
        {
            return Err(AssetError::MissingUnits);
        }

        Ok(Self {
            id: FixedAssetId::new(),
            asset_name: input.asset_name,
            asset_code,
            category: input.category,
            purchase_date: input.purchase_date,
            purchase_cost: input.purchase_cost,
            salvage_value: input.salvage_value,
            useful_life_years: input.useful_life_years,
            depreciation_method: input.depreciation_method,
            total_estimated_units: input.total_estimated_units,
            accumulated_depreciation: Decimal::ZERO,
            status: AssetStatus::Active,
            disposal_date: None,
            disposal_amount: None,
            location: input.location,
            description: input.description,
            account_id,
        })
    }

    /// Applies editable attributes, then re-derives the status from the new
    /// salvage value: FULLY_DEPRECIATED once book value is at or below it,
    /// ACTIVE otherwise.
    ///
    /// # Errors
    ///
    /// `NotActive` for a disposed asset; otherwise the same term validation
    /// as [`Self::register`].
    pub fn apply_update(&mut self, input: UpdateAssetInput) -> Result<(), AssetError> {
        if self.status == AssetStatus::Disposed {
            return Err(AssetError::NotActive(self.status));
        }
        Self::validate_terms(
            self.purchase_cost,
            input.salvage_value,
            input.useful_life_years,
        )?;
        self.asset_name = input.asset_name;
        self.category = input.category;
        self.location = input.location;
        self.description = input.description;
        self.useful_life_years = input.useful_life_years;
        self.salvage_value = input.salvage_value;
        self.status = if self.net_book_value() <= self.salvage_value {
            AssetStatus::FullyDepreciated
        } else {
            AssetStatus::Active
        };
        Ok(())
    }

    /// Checks the asset may leave the register.
    ///
    /// # Errors
    ///
    /// `NotDeletable` unless the asset is disposed.
    pub fn ensure_deletable(&self) -> Result<(), AssetError> {
        if self.status == AssetStatus::Disposed {
            Ok(())
        } else {
            Err(AssetError::NotDeletable(self.status))
        }
    }

    fn validate_terms(cost: Decimal, salvage: Decimal, years: u32) -> Result<(), AssetError> {
        if cost < Decimal::ZERO || salvage < Decimal::ZERO {
            return Err(AssetError::NegativeAmount);
        }
        if salvage > cost {
            return Err(AssetError::SalvageExceedsCost { cost, salvage });
        }
        if years == 0 {
            return Err(AssetError::InvalidUsefulLife);
        }
        Ok(())
    }
}

/// Builds an asset code such as `EQU-3`.
#[must_use]
pub fn generate_asset_code(category: AssetCategory, sequence: usize) -> String {
    format!("{}-{sequence}", category.code_prefix())
}
