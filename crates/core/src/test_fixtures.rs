//! In-memory books for unit tests.

use chrono::NaiveDate;
use tally_shared::types::{AccountId, JournalEntryId};

use crate::ledger::{
    AccountType, ChartOfAccounts, CreateJournalInput, JournalEntry, JournalLineInput,
    JournalService, JournalWorkflow, NewAccount, PostingEngine,
};

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Chart plus journal entries, posted through the real engine.
#[derive(Debug, Default)]
pub(crate) struct Books {
    pub chart: ChartOfAccounts,
    pub entries: Vec<JournalEntry>,
    next_sequence: u64,
}

impl Books {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(&mut self, code: &str, name: &str, account_type: AccountType) -> AccountId {
        self.chart
            .insert(NewAccount::new(code, name, account_type))
            .unwrap()
            .id
    }

    pub fn draft(
        &mut self,
        date: NaiveDate,
        description: &str,
        lines: Vec<JournalLineInput>,
    ) -> JournalEntryId {
        self.draft_input(CreateJournalInput {
            date,
            period: None,
            description: description.to_string(),
            reference: None,
            lines,
        })
    }

    pub fn draft_input(&mut self, input: CreateJournalInput) -> JournalEntryId {
        self.next_sequence += 1;
        let chart = &self.chart;
        let entry = JournalService::build_entry(input, self.next_sequence, |id| {
            chart.contains(id)
        })
        .unwrap();
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    pub fn post(
        &mut self,
        date: NaiveDate,
        description: &str,
        lines: Vec<JournalLineInput>,
    ) -> JournalEntryId {
        let id = self.draft(date, description, lines);
        self.post_last();
        id
    }

    pub fn post_input(&mut self, input: CreateJournalInput) -> JournalEntryId {
        let id = self.draft_input(input);
        self.post_last();
        id
    }

    pub fn balance(&self, code: &str) -> rust_decimal::Decimal {
        self.chart.find_by_code(code).unwrap().balance
    }

    fn post_last(&mut self) {
        let entry = self.entries.last_mut().unwrap();
        entry.status = JournalWorkflow::submit(entry.status).unwrap();
        PostingEngine::post(&mut self.chart, entry).unwrap();
    }
}
