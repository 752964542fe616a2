//! Asset disposal.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::AccountId;

use super::error::AssetError;
use super::types::{AssetStatus, FixedAsset};
use crate::ledger::{CashFlowCategory, JournalLineInput};

/// Accounts touched by a disposal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisposalAccounts {
    /// Receives the proceeds.
    pub cash: AccountId,
    /// Accumulated depreciation to reverse.
    pub accumulated_depreciation: AccountId,
    /// Gain on disposal (revenue).
    pub gain: AccountId,
    /// Loss on disposal (expense).
    pub loss: AccountId,
}

/// Figures of a disposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposalPlan {
    /// Disposal date.
    pub date: NaiveDate,
    /// Cash received.
    pub proceeds: Decimal,
    /// Book value at disposal.
    pub net_book_value: Decimal,
    /// Proceeds minus book value; positive is a gain.
    pub gain_loss: Decimal,
}

impl DisposalPlan {
    /// Computes the disposal figures.
    ///
    /// # Errors
    ///
    /// `AlreadyDisposed` or `NegativeAmount`.
    pub fn new(asset: &FixedAsset, date: NaiveDate, proceeds: Decimal) -> Result<Self, AssetError> {
        if asset.status == AssetStatus::Disposed {
            return Err(AssetError::AlreadyDisposed);
        }
        if proceeds < Decimal::ZERO {
            return Err(AssetError::NegativeAmount);
        }
        let net_book_value = asset.net_book_value();
        Ok(Self {
            date,
            proceeds,
            net_book_value,
            gain_loss: proceeds - net_book_value,
        })
    }

    /// Journal lines removing the asset from the books: debit cash for the
    /// proceeds, debit accumulated depreciation, credit the asset account for
    /// cost, then a gain or loss line when nonzero.
    #[must_use]
    pub fn journal_lines(
        &self,
        asset: &FixedAsset,
        accounts: DisposalAccounts,
    ) -> Vec<JournalLineInput> {
        let name = &asset.asset_name;
        let mut lines = vec![
            JournalLineInput::debit(accounts.cash, self.proceeds)
                .with_description(format!("Disposal proceeds: {name}"))
                .with_category(CashFlowCategory::Investing),
            JournalLineInput::debit(
                accounts.accumulated_depreciation,
                asset.accumulated_depreciation,
            )
            .with_description(format!("Remove accumulated depreciation: {name}")),
            JournalLineInput::credit(asset.account_id, asset.purchase_cost)
                .with_description(format!("Disposal of {name}")),
        ];

        if self.gain_loss > Decimal::ZERO {
            lines.push(
                JournalLineInput::credit(accounts.gain, self.gain_loss)
                    .with_description(format!("Gain on disposal: {name}")),
            );
        } else if self.gain_loss < Decimal::ZERO {
            lines.push(
                JournalLineInput::debit(accounts.loss, self.gain_loss.abs())
                    .with_description(format!("Loss on disposal: {name}")),
            );
        }
        lines
    }

    /// Marks the asset DISPOSED with the disposal date and proceeds.
    pub fn apply(&self, asset: &mut FixedAsset) {
        asset.status = AssetStatus::Disposed;
        asset.disposal_date = Some(self.date);
        asset.disposal_amount = Some(self.proceeds);
    }
}
