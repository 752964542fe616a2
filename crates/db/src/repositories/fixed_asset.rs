//! Fixed asset repository: registration, depreciation runs, disposal.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tally_core::assets::{
    AssetError, AssetStatus, CreateAssetInput, DepreciationCharge, DepreciationEngine,
    DisposalAccounts, DisposalPlan, FixedAsset, ScheduleRow, UpdateAssetInput,
    generate_asset_code,
};
use tally_core::ledger::{AccountType, CreateJournalInput, LedgerError, NewAccount};
use tally_shared::types::FixedAssetId;
use tally_shared::{AccountCodes, AppError};
use tracing::{debug, info};

use super::journal::{PostedJournal, create_and_post_in};
use crate::store::{Database, DbError, Tables};

/// Error types for fixed asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetRepoError {
    /// Asset rule violated.
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<LedgerError> for AssetRepoError {
    fn from(err: LedgerError) -> Self {
        Self::Asset(err.into())
    }
}

impl From<AssetRepoError> for AppError {
    fn from(err: AssetRepoError) -> Self {
        match err {
            AssetRepoError::Asset(e) => e.into(),
            AssetRepoError::Database(e) => e.into(),
        }
    }
}

/// A registered asset with its purchase journal.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredAsset {
    /// The asset.
    pub asset: FixedAsset,
    /// Debit asset account, credit cash.
    pub purchase: PostedJournal,
}

/// Outcome of one depreciation run.
#[derive(Debug, Clone, Serialize)]
pub struct DepreciationRun {
    /// The charge recorded.
    pub charge: DepreciationCharge,
    /// Absent when the charge was zero.
    pub journal: Option<PostedJournal>,
}

/// Outcome of a disposal.
#[derive(Debug, Clone, Serialize)]
pub struct DisposalResult {
    /// The disposed asset.
    pub asset: FixedAsset,
    /// Proceeds, book value, and gain or loss.
    pub plan: DisposalPlan,
    /// The disposal journal.
    pub journal: PostedJournal,
}

/// Fixed asset repository.
#[derive(Debug, Clone)]
pub struct FixedAssetRepository {
    db: Database,
    codes: AccountCodes,
}

impl FixedAssetRepository {
    /// Creates a new fixed asset repository.
    #[must_use]
    pub const fn new(db: Database, codes: AccountCodes) -> Self {
        Self { db, codes }
    }

    /// Registers an asset, opens its dedicated account, and posts the
    /// purchase.
    ///
    /// # Errors
    ///
    /// Returns an error if the asset terms are invalid or the asset code is
    /// already used.
    pub fn create_asset(&self, input: CreateAssetInput) -> Result<RegisteredAsset, AssetRepoError> {
        let registered = self.db.transaction(|t| {
            let asset_code = match input.asset_code.clone() {
                Some(code) => code,
                None => next_asset_code(t, &input),
            };
            if t.fixed_assets().values().any(|a| a.asset_code == asset_code) {
                return Err(AssetRepoError::from(AssetError::DuplicateAssetCode(asset_code)));
            }

            let account_code = t.chart().next_sub_code(&self.codes.fixed_asset_prefix);
            let account = t.chart_mut().insert(
                NewAccount::new(
                    account_code,
                    format!("Fixed Asset - {}", input.asset_name),
                    AccountType::Asset,
                )
                .with_sub_type("Fixed Asset"),
            )?;
            let asset = FixedAsset::register(input, asset_code, account.id)?;

            let cash = t
                .chart_mut()
                .find_or_create(&self.codes.cash, "Cash and Bank", AccountType::Asset)?;
            let purchase = create_and_post_in(
                t,
                CreateJournalInput {
                    date: asset.purchase_date,
                    period: None,
                    description: format!("Asset Purchase: {}", asset.asset_name),
                    reference: Some(asset.asset_code.clone()),
                    lines: DepreciationEngine::purchase_lines(&asset, cash),
                },
            )?;
            t.fixed_assets_mut().insert(asset.id, asset.clone());
            Ok::<_, AssetRepoError>(RegisteredAsset { asset, purchase })
        })?;
        info!(
            asset_id = %registered.asset.id,
            asset_code = %registered.asset.asset_code,
            cost = %registered.asset.purchase_cost,
            "Fixed asset registered"
        );
        Ok(registered)
    }

    /// Finds an asset by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn find_by_id(&self, id: FixedAssetId) -> Result<Option<FixedAsset>, AssetRepoError> {
        Ok(self.db.read(|t| t.fixed_assets().get(&id).cloned())?)
    }

    /// Lists assets, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn list_assets(
        &self,
        status: Option<AssetStatus>,
    ) -> Result<Vec<FixedAsset>, AssetRepoError> {
        Ok(self.db.read(|t| {
            t.fixed_assets()
                .values()
                .filter(|a| status.is_none_or(|s| a.status == s))
                .cloned()
                .collect()
        })?)
    }

    /// Updates descriptive fields and depreciation terms.
    ///
    /// # Errors
    ///
    /// `NotFound`, or invalid terms.
    pub fn update_asset(
        &self,
        id: FixedAssetId,
        input: UpdateAssetInput,
    ) -> Result<FixedAsset, AssetRepoError> {
        self.db.transaction(|t| {
            let asset = t
                .fixed_assets_mut()
                .get_mut(&id)
                .ok_or(AssetError::NotFound(id))?;
            asset.apply_update(input)?;
            Ok::<_, AssetRepoError>(asset.clone())
        })
        .inspect(|a| info!(asset_id = %id, status = %a.status, "Fixed asset updated"))
    }

    /// Removes a disposed asset from the register. Its account and
    /// journals stay in the ledger.
    ///
    /// # Errors
    ///
    /// `NotFound`, or `NotDeletable` unless the asset is disposed.
    pub fn delete_asset(&self, id: FixedAssetId) -> Result<(), AssetRepoError> {
        self.db.transaction(|t| {
            let asset = t.fixed_assets().get(&id).ok_or(AssetError::NotFound(id))?;
            asset.ensure_deletable()?;
            t.fixed_assets_mut().remove(&id);
            Ok::<_, AssetRepoError>(())
        })?;
        info!(asset_id = %id, "Fixed asset deleted");
        Ok(())
    }

    /// Records one period of depreciation and posts it.
    ///
    /// # Errors
    ///
    /// `NotFound`, `NotActive`, or missing units for units of production.
    pub fn record_depreciation(
        &self,
        id: FixedAssetId,
        date: NaiveDate,
        units_this_period: Option<Decimal>,
    ) -> Result<DepreciationRun, AssetRepoError> {
        let run = self.db.transaction(|t| {
            let mut asset = t
                .fixed_assets()
                .get(&id)
                .cloned()
                .ok_or(AssetError::NotFound(id))?;
            let charge = DepreciationEngine::record(&mut asset, date, units_this_period)?;

            let journal = if charge.amount.is_zero() {
                None
            } else {
                let expense = t.chart_mut().find_or_create(
                    &self.codes.depreciation_expense,
                    "Depreciation Expense",
                    AccountType::Expense,
                )?;
                let accumulated = t.chart_mut().find_or_create(
                    &self.codes.accumulated_depreciation,
                    "Accumulated Depreciation",
                    AccountType::Asset,
                )?;
                Some(create_and_post_in(
                    t,
                    CreateJournalInput {
                        date,
                        period: None,
                        description: format!("Depreciation: {}", asset.asset_name),
                        reference: Some(asset.asset_code.clone()),
                        lines: DepreciationEngine::journal_lines(
                            &asset,
                            charge.amount,
                            expense,
                            accumulated,
                        ),
                    },
                )?)
            };
            t.fixed_assets_mut().insert(id, asset);
            Ok::<_, AssetRepoError>(DepreciationRun { charge, journal })
        })?;
        if run.journal.is_none() {
            debug!(asset_id = %id, "Zero depreciation, nothing posted");
        }
        info!(
            asset_id = %id,
            amount = %run.charge.amount,
            accumulated = %run.charge.accumulated_depreciation,
            status = %run.charge.status,
            "Depreciation recorded"
        );
        Ok(run)
    }

    /// Projects the next `months` charges without recording them.
    ///
    /// # Errors
    ///
    /// `NotFound`, or as for [`DepreciationEngine::schedule`].
    pub fn schedule(
        &self,
        id: FixedAssetId,
        months: u32,
    ) -> Result<Vec<ScheduleRow>, AssetRepoError> {
        let asset = self
            .find_by_id(id)?
            .ok_or(AssetError::NotFound(id))?;
        Ok(DepreciationEngine::schedule(&asset, months)?)
    }

    /// Disposes of an asset and posts the disposal journal.
    ///
    /// # Errors
    ///
    /// `NotFound`, `AlreadyDisposed`, or negative proceeds.
    pub fn dispose(
        &self,
        id: FixedAssetId,
        date: NaiveDate,
        proceeds: Decimal,
    ) -> Result<DisposalResult, AssetRepoError> {
        let result = self.db.transaction(|t| {
            let mut asset = t
                .fixed_assets()
                .get(&id)
                .cloned()
                .ok_or(AssetError::NotFound(id))?;
            let plan = DisposalPlan::new(&asset, date, proceeds)?;
            let accounts = DisposalAccounts {
                cash: t.chart_mut().find_or_create(
                    &self.codes.cash,
                    "Cash and Bank",
                    AccountType::Asset,
                )?,
                accumulated_depreciation: t.chart_mut().find_or_create(
                    &self.codes.accumulated_depreciation,
                    "Accumulated Depreciation",
                    AccountType::Asset,
                )?,
                gain: t.chart_mut().find_or_create(
                    &self.codes.gain_on_disposal,
                    "Gain on Asset Disposal",
                    AccountType::Revenue,
                )?,
                loss: t.chart_mut().find_or_create(
                    &self.codes.loss_on_disposal,
                    "Loss on Asset Disposal",
                    AccountType::Expense,
                )?,
            };
            let journal = create_and_post_in(
                t,
                CreateJournalInput {
                    date,
                    period: None,
                    description: format!("Asset Disposal: {}", asset.asset_name),
                    reference: Some(asset.asset_code.clone()),
                    lines: plan.journal_lines(&asset, accounts),
                },
            )?;
            plan.apply(&mut asset);
            t.fixed_assets_mut().insert(id, asset.clone());
            Ok::<_, AssetRepoError>(DisposalResult {
                asset,
                plan,
                journal,
            })
        })?;
        info!(
            asset_id = %id,
            proceeds = %result.plan.proceeds,
            gain_loss = %result.plan.gain_loss,
            "Fixed asset disposed"
        );
        Ok(result)
    }
}

fn next_asset_code(tables: &Tables, input: &CreateAssetInput) -> String {
    let in_category = tables
        .fixed_assets()
        .values()
        .filter(|a| a.category == input.category)
        .count();
    (in_category + 1..)
        .map(|n| generate_asset_code(input.category, n))
        .find(|code| !tables.fixed_assets().values().any(|a| &a.asset_code == code))
        .unwrap_or_else(|| generate_asset_code(input.category, in_category + 1))
}
