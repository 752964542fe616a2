//! Fixed asset error types.

use rust_decimal::Decimal;
use tally_shared::AppError;
use tally_shared::types::FixedAssetId;
use thiserror::Error;

use super::types::AssetStatus;
use crate::ledger::LedgerError;

/// Errors from fixed asset workflows.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Asset not found.
    #[error("Fixed asset not found: {0}")]
    NotFound(FixedAssetId),

    /// Asset code already used.
    #[error("Duplicate asset code: {0}")]
    DuplicateAssetCode(String),

    /// The asset's status does not allow depreciation or changes.
    #[error("Operation not allowed on a {0} asset")]
    NotActive(AssetStatus),

    /// Only disposed assets leave the register.
    #[error("Cannot delete a {0} asset; dispose of it first")]
    NotDeletable(AssetStatus),

    /// Asset has already been disposed.
    #[error("Asset has already been disposed")]
    AlreadyDisposed,

    /// Useful life must be positive.
    #[error("Useful life must be at least one year")]
    InvalidUsefulLife,

    /// Units of production needs both the period units and the total.
    #[error("Units of production requires units for the period and total estimated units")]
    MissingUnits,

    /// Amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Salvage value above cost.
    #[error("Salvage value {salvage} exceeds purchase cost {cost}")]
    SalvageExceedsCost {
        /// Purchase cost.
        cost: Decimal,
        /// Salvage value.
        salvage: Decimal,
    },

    /// Posting the asset's journal failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl AssetError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ASSET_NOT_FOUND",
            Self::DuplicateAssetCode(_) => "DUPLICATE_ASSET_CODE",
            Self::NotActive(_) => "ASSET_NOT_ACTIVE",
            Self::AlreadyDisposed => "ASSET_ALREADY_DISPOSED",
            Self::NotDeletable(_) => "ASSET_NOT_DELETABLE",
            Self::InvalidUsefulLife => "INVALID_USEFUL_LIFE",
            Self::MissingUnits => "MISSING_UNITS",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::SalvageExceedsCost { .. } => "SALVAGE_EXCEEDS_COST",
            Self::Ledger(err) => err.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::DuplicateAssetCode(_)
            | Self::InvalidUsefulLife
            | Self::MissingUnits
            | Self::NegativeAmount
            | Self::SalvageExceedsCost { .. } => 400,
            Self::NotActive(_) | Self::AlreadyDisposed | Self::NotDeletable(_) => 422,
            Self::Ledger(err) => err.http_status_code(),
        }
    }
}

impl From<AssetError> for AppError {
    fn from(err: AssetError) -> Self {
        Self::from_status(err.http_status_code(), err.to_string())
    }
}
