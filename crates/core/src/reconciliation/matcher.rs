//! Match suggestion and resolution.

use rust_decimal::Decimal;
use tally_shared::types::JournalLineId;

use super::error::ReconError;
use super::types::{MatchSuggestion, ReconItem, ReconStatus};
use crate::aggregation::{AggregationEngine, EntrySelection};
use crate::fiscal::PeriodLabel;
use crate::ledger::JournalEntry;

const MAX_SCORE: i64 = 100;

/// Stateless reconciliation matcher.
pub struct ReconMatcher;

impl ReconMatcher {
    /// Proposes matches between unmatched items and the posted lines of a
    /// period.
    ///
    /// A line is a candidate when its face amount (debit if nonzero, else
    /// credit) equals the item amount exactly. Suggestions are grouped by
    /// item in input order, best score first; ties keep chronological order.
    #[must_use]
    pub fn suggest(
        items: &[ReconItem],
        entries: &[JournalEntry],
        period: &PeriodLabel,
    ) -> Vec<MatchSuggestion> {
        let posted = AggregationEngine::select(entries, &EntrySelection::Period(period.clone()));

        let mut suggestions = Vec::new();
        for item in items.iter().filter(|i| i.status == ReconStatus::Unmatched) {
            let mut for_item: Vec<MatchSuggestion> = posted
                .iter()
                .flat_map(|entry| entry.lines.iter().map(move |line| (*entry, line)))
                .filter(|(_, line)| line.face_amount() == item.amount)
                .map(|(entry, line)| MatchSuggestion {
                    recon_item_id: item.id,
                    journal_id: entry.id,
                    journal_line_id: line.id,
                    score: Self::score(item, entry),
                })
                .collect();
            for_item.sort_by(|a, b| b.score.cmp(&a.score));
            suggestions.extend(for_item);
        }
        suggestions
    }

    /// Marks an item MATCHED against a line of a posted entry.
    ///
    /// # Errors
    ///
    /// `AlreadyMatched`, `JournalNotPosted`, or `LineNotFound`.
    pub fn resolve(
        item: &mut ReconItem,
        entry: &JournalEntry,
        line_id: JournalLineId,
        variance: Option<Decimal>,
    ) -> Result<(), ReconError> {
        if item.status == ReconStatus::Matched {
            return Err(ReconError::AlreadyMatched(item.id));
        }
        if !entry.is_posted() {
            return Err(ReconError::JournalNotPosted(entry.id));
        }
        if entry.line(line_id).is_none() {
            return Err(ReconError::LineNotFound(line_id));
        }

        item.status = ReconStatus::Matched;
        item.matched_journal_id = Some(entry.id);
        item.matched_journal_line_id = Some(line_id);
        item.variance = variance.unwrap_or(Decimal::ZERO);
        Ok(())
    }

    fn score(item: &ReconItem, entry: &JournalEntry) -> u32 {
        let days = (entry.date - item.date).num_days().abs();
        u32::try_from((MAX_SCORE - days).max(0)).unwrap_or(0)
    }
}
