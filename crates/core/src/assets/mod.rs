//! Fixed assets: depreciation and disposal.

pub mod depreciation;
pub mod disposal;
pub mod error;
pub mod types;

#[cfg(test)]
mod depreciation_props;

pub use depreciation::{DepreciationCharge, DepreciationEngine, ScheduleRow};
pub use disposal::{DisposalAccounts, DisposalPlan};
pub use error::AssetError;
pub use types::{
    AssetCategory, AssetStatus, CreateAssetInput, DepreciationMethod, FixedAsset,
    UpdateAssetInput, generate_asset_code,
};
