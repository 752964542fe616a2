//! Chart of accounts stored as an arena with index links.
//!
//! Accounts live in a slot vector; parent links are slot indices, and
//! lookups by id or code go through side indices. Parent assignment walks
//! the ancestor chain so the hierarchy can never contain a cycle.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tally_shared::types::AccountId;

use super::account::{Account, NewAccount};
use super::balance::RunningBalance;
use super::error::LedgerError;
use super::types::{AccountStatus, AccountType};

#[derive(Debug, Clone)]
struct Node {
    account: Account,
    parent: Option<usize>,
}

/// The chart of accounts.
#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    slots: Vec<Option<Node>>,
    by_id: HashMap<AccountId, usize>,
    by_code: HashMap<String, usize>,
}

impl ChartOfAccounts {
    /// Creates an empty chart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if the chart has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Adds an account with a zero balance.
    ///
    /// # Errors
    ///
    /// `DuplicateAccountCode` if the code is taken, `AccountNotFound` if the
    /// parent does not exist.
    pub fn insert(&mut self, input: NewAccount) -> Result<Account, LedgerError> {
        if self.by_code.contains_key(&input.code) {
            return Err(LedgerError::DuplicateAccountCode(input.code));
        }
        let parent = input
            .parent_id
            .map(|pid| self.index_of(pid).ok_or(LedgerError::AccountNotFound(pid)))
            .transpose()?;

        let account = Account {
            id: AccountId::new(),
            code: input.code,
            name: input.name,
            account_type: input.account_type,
            sub_type: input.sub_type,
            parent_id: input.parent_id,
            balance: Decimal::ZERO,
            status: AccountStatus::Active,
            version: 0,
        };

        let idx = self.slots.len();
        self.by_id.insert(account.id, idx);
        self.by_code.insert(account.code.clone(), idx);
        self.slots.push(Some(Node {
            account: account.clone(),
            parent,
        }));
        Ok(account)
    }

    /// Looks up an account by id.
    #[must_use]
    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.index_of(id).and_then(|idx| self.node(idx)).map(|n| &n.account)
    }

    /// Looks up an account by id, failing with `AccountNotFound`.
    pub fn require(&self, id: AccountId) -> Result<&Account, LedgerError> {
        self.get(id).ok_or(LedgerError::AccountNotFound(id))
    }

    /// Looks up an account by its code.
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<&Account> {
        self.by_code
            .get(code)
            .and_then(|idx| self.node(*idx))
            .map(|n| &n.account)
    }

    /// Returns true if the account exists.
    #[must_use]
    pub fn contains(&self, id: AccountId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Returns the type of an account, if it exists.
    #[must_use]
    pub fn account_type_of(&self, id: AccountId) -> Option<AccountType> {
        self.get(id).map(|a| a.account_type)
    }

    /// Iterates accounts in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.slots.iter().flatten().map(|n| &n.account)
    }

    /// Accounts ordered by code.
    #[must_use]
    pub fn sorted_by_code(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.iter().collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        accounts
    }

    /// Resolves an account by code, falling back to the first account (by
    /// code) whose name contains `keyword`, case-insensitively.
    #[must_use]
    pub fn find_by_code_or_name(&self, code: &str, keyword: &str) -> Option<&Account> {
        if let Some(account) = self.find_by_code(code) {
            return Some(account);
        }
        let keyword = keyword.to_lowercase();
        self.sorted_by_code()
            .into_iter()
            .find(|a| a.name.to_lowercase().contains(&keyword))
    }

    /// Returns the parent of an account.
    #[must_use]
    pub fn parent(&self, id: AccountId) -> Option<&Account> {
        self.index_of(id)
            .and_then(|idx| self.node(idx))
            .and_then(|n| n.parent)
            .and_then(|p| self.node(p))
            .map(|n| &n.account)
    }

    /// Ancestors of an account, nearest first.
    pub fn ancestors(&self, id: AccountId) -> Result<Vec<&Account>, LedgerError> {
        let mut idx = self.index_of(id).ok_or(LedgerError::AccountNotFound(id))?;
        let mut out = Vec::new();
        while let Some(parent) = self.node(idx).and_then(|n| n.parent) {
            if let Some(node) = self.node(parent) {
                out.push(&node.account);
            }
            idx = parent;
        }
        Ok(out)
    }

    /// Direct children of an account, ordered by code.
    #[must_use]
    pub fn children(&self, id: AccountId) -> Vec<&Account> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        let mut children: Vec<&Account> = self
            .slots
            .iter()
            .flatten()
            .filter(|n| n.parent == Some(idx))
            .map(|n| &n.account)
            .collect();
        children.sort_by(|a, b| a.code.cmp(&b.code));
        children
    }

    /// Assigns or clears an account's parent.
    ///
    /// # Errors
    ///
    /// `AccountHierarchyCycle` if `parent_id` is the account itself or one of
    /// its descendants.
    pub fn set_parent(
        &mut self,
        id: AccountId,
        parent_id: Option<AccountId>,
    ) -> Result<(), LedgerError> {
        let idx = self.index_of(id).ok_or(LedgerError::AccountNotFound(id))?;
        let parent = match parent_id {
            Some(pid) => {
                let pidx = self.index_of(pid).ok_or(LedgerError::AccountNotFound(pid))?;
                let mut cursor = Some(pidx);
                while let Some(c) = cursor {
                    if c == idx {
                        return Err(LedgerError::AccountHierarchyCycle {
                            account_id: id,
                            parent_id: pid,
                        });
                    }
                    cursor = self.node(c).and_then(|n| n.parent);
                }
                Some(pidx)
            }
            None => None,
        };

        let node = self.node_mut(idx).ok_or(LedgerError::AccountNotFound(id))?;
        node.parent = parent;
        node.account.parent_id = parent_id;
        Ok(())
    }

    /// Updates an account's name and sub-type.
    pub fn rename(
        &mut self,
        id: AccountId,
        name: impl Into<String>,
        sub_type: Option<String>,
    ) -> Result<&Account, LedgerError> {
        let node = self
            .index_of(id)
            .and_then(|idx| self.node_mut(idx))
            .ok_or(LedgerError::AccountNotFound(id))?;
        node.account.name = name.into();
        node.account.sub_type = sub_type;
        Ok(&node.account)
    }

    /// Activates or retires an account.
    pub fn set_status(&mut self, id: AccountId, status: AccountStatus) -> Result<(), LedgerError> {
        let node = self
            .index_of(id)
            .and_then(|idx| self.node_mut(idx))
            .ok_or(LedgerError::AccountNotFound(id))?;
        node.account.status = status;
        Ok(())
    }

    /// Removes an account that has no children.
    ///
    /// Whether journal lines still reference the account is the caller's
    /// check; the chart does not see journals.
    pub fn remove(&mut self, id: AccountId) -> Result<Account, LedgerError> {
        let idx = self.index_of(id).ok_or(LedgerError::AccountNotFound(id))?;
        if self.slots.iter().flatten().any(|n| n.parent == Some(idx)) {
            return Err(LedgerError::AccountHasChildren(id));
        }
        let node = self
            .slots
            .get_mut(idx)
            .and_then(Option::take)
            .ok_or(LedgerError::AccountNotFound(id))?;
        self.by_id.remove(&id);
        self.by_code.remove(&node.account.code);
        Ok(node.account)
    }

    /// Applies a signed balance change and bumps the account version.
    ///
    /// Callers hold the store's write lock for the whole unit of work, so
    /// no other writer can interleave between read and write.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if the account does not exist.
    pub fn apply_change(
        &mut self,
        id: AccountId,
        change: Decimal,
    ) -> Result<RunningBalance, LedgerError> {
        let node = self
            .index_of(id)
            .and_then(|idx| self.node_mut(idx))
            .ok_or(LedgerError::AccountNotFound(id))?;
        let account = &mut node.account;
        let running = RunningBalance::next_entry(
            &RunningBalance::opening(account.version, account.balance),
            change,
        );
        account.balance = running.current_balance;
        account.version = running.account_version;
        Ok(running)
    }

    /// Next free sub-ledger code under `parent_code`, e.g. `1200-3`.
    #[must_use]
    pub fn next_sub_code(&self, parent_code: &str) -> String {
        let prefix = format!("{parent_code}-");
        let mut n = self.by_code.keys().filter(|c| c.starts_with(&prefix)).count() + 1;
        loop {
            let candidate = format!("{prefix}{n}");
            if !self.by_code.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Returns the account with `code`, creating it when absent.
    ///
    /// # Errors
    ///
    /// Propagates insert errors for a newly created account.
    pub fn find_or_create(
        &mut self,
        code: &str,
        name: &str,
        account_type: AccountType,
    ) -> Result<AccountId, LedgerError> {
        if let Some(account) = self.find_by_code(code) {
            return Ok(account.id);
        }
        Ok(self.insert(NewAccount::new(code, name, account_type))?.id)
    }

    /// Creates a per-counterparty account under the control account
    /// `parent_code`, with code `<parent_code>-<n>`.
    ///
    /// # Errors
    ///
    /// `AccountCodeNotFound` when the control account does not exist.
    pub fn create_sub_ledger_account(
        &mut self,
        parent_code: &str,
        name: &str,
        sub_type: &str,
    ) -> Result<Account, LedgerError> {
        let parent = self
            .find_by_code(parent_code)
            .map(|a| (a.id, a.account_type))
            .ok_or_else(|| LedgerError::AccountCodeNotFound(parent_code.to_string()))?;
        let code = self.next_sub_code(parent_code);
        self.insert(
            NewAccount::new(code, name, parent.1)
                .with_sub_type(sub_type)
                .with_parent(parent.0),
        )
    }

    fn index_of(&self, id: AccountId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    fn node(&self, idx: usize) -> Option<&Node> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn chart_with(codes: &[(&str, AccountType)]) -> (ChartOfAccounts, Vec<AccountId>) {
        let mut chart = ChartOfAccounts::new();
        let ids = codes
            .iter()
            .map(|(code, t)| {
                chart
                    .insert(NewAccount::new(*code, format!("Account {code}"), *t))
                    .unwrap()
                    .id
            })
            .collect();
        (chart, ids)
    }

    #[test]
    fn test_insert_and_lookup() {
        let (chart, ids) =
            chart_with(&[("1000", AccountType::Asset), ("4000", AccountType::Revenue)]);
        assert_eq!(chart.len(), 2);
        assert_eq!(chart.find_by_code("4000").map(|a| a.id), Some(ids[1]));
        assert_eq!(chart.account_type_of(ids[0]), Some(AccountType::Asset));
        assert_eq!(chart.get(ids[0]).map(|a| a.balance), Some(Decimal::ZERO));
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let (mut chart, _) = chart_with(&[("1000", AccountType::Asset)]);
        let err = chart
            .insert(NewAccount::new("1000", "Other", AccountType::Asset))
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateAccountCode(code) if code == "1000"));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut chart = ChartOfAccounts::new();
        let missing = AccountId::new();
        let err = chart
            .insert(NewAccount::new("1200-1", "AR - Acme", AccountType::Asset).with_parent(missing))
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound(id) if id == missing));
    }

    #[test]
    fn test_cycle_rejected() {
        let (mut chart, ids) = chart_with(&[
            ("1000", AccountType::Asset),
            ("1100", AccountType::Asset),
            ("1110", AccountType::Asset),
        ]);
        chart.set_parent(ids[1], Some(ids[0])).unwrap();
        chart.set_parent(ids[2], Some(ids[1])).unwrap();

        let err = chart.set_parent(ids[0], Some(ids[2])).unwrap_err();
        assert!(matches!(err, LedgerError::AccountHierarchyCycle { .. }));

        let err = chart.set_parent(ids[0], Some(ids[0])).unwrap_err();
        assert!(matches!(err, LedgerError::AccountHierarchyCycle { .. }));

        // The rejected assignments left the hierarchy untouched.
        assert!(chart.parent(ids[0]).is_none());
        let ancestors: Vec<&str> = chart
            .ancestors(ids[2])
            .unwrap()
            .iter()
            .map(|a| a.code.as_str())
            .collect();
        assert_eq!(ancestors, vec!["1100", "1000"]);
    }

    #[test]
    fn test_children_and_remove() {
        let (mut chart, ids) = chart_with(&[("1200", AccountType::Asset)]);
        let child = chart
            .insert(NewAccount::new("1200-1", "AR - Acme", AccountType::Asset).with_parent(ids[0]))
            .unwrap()
            .id;

        assert_eq!(chart.children(ids[0]).len(), 1);
        assert!(matches!(chart.remove(ids[0]), Err(LedgerError::AccountHasChildren(_))));

        chart.remove(child).unwrap();
        assert!(chart.get(child).is_none());
        assert!(chart.find_by_code("1200-1").is_none());
        chart.remove(ids[0]).unwrap();
        assert!(chart.is_empty());
    }

    #[test]
    fn test_apply_change_bumps_version() {
        let (mut chart, ids) = chart_with(&[("1000", AccountType::Asset)]);

        let rb = chart.apply_change(ids[0], dec!(250.00)).unwrap();
        assert_eq!(rb.previous_balance, Decimal::ZERO);
        assert_eq!(rb.current_balance, dec!(250.00));
        assert_eq!(rb.account_version, 1);

        let rb = chart.apply_change(ids[0], dec!(-50.00)).unwrap();
        assert_eq!(rb.previous_balance, dec!(250.00));
        assert_eq!(rb.account_version, 2);
        assert_eq!(chart.get(ids[0]).map(|a| a.balance), Some(dec!(200.00)));

        assert!(matches!(
            chart.apply_change(AccountId::new(), dec!(1)),
            Err(LedgerError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_find_or_create_reuses_code() {
        let mut chart = ChartOfAccounts::new();
        let first = chart
            .find_or_create("2100", "Accounts Payable - Control", AccountType::Liability)
            .unwrap();
        let again = chart.find_or_create("2100", "Ignored", AccountType::Asset).unwrap();
        assert_eq!(first, again);
        assert_eq!(chart.len(), 1);
        assert_eq!(
            chart.get(first).map(|a| a.name.as_str()),
            Some("Accounts Payable - Control")
        );
    }

    #[test]
    fn test_sub_ledger_account_under_control() {
        let (mut chart, ids) = chart_with(&[("1200", AccountType::Asset)]);
        let acme = chart
            .create_sub_ledger_account("1200", "AR - Acme", "Accounts Receivable")
            .unwrap();
        assert_eq!(acme.code, "1200-1");
        assert_eq!(acme.account_type, AccountType::Asset);
        assert_eq!(chart.parent(acme.id).map(|a| a.id), Some(ids[0]));

        assert!(matches!(
            chart.create_sub_ledger_account("2100", "AP - Acme", "Accounts Payable"),
            Err(LedgerError::AccountCodeNotFound(code)) if code == "2100"
        ));
    }

    #[test]
    fn test_next_sub_code_skips_taken_codes() {
        let (mut chart, ids) = chart_with(&[("2100", AccountType::Liability)]);
        assert_eq!(chart.next_sub_code("2100"), "2100-1");
        chart
            .insert(
                NewAccount::new("2100-2", "AP - Legacy", AccountType::Liability)
                    .with_parent(ids[0]),
            )
            .unwrap();
        assert_eq!(chart.next_sub_code("2100"), "2100-3");
    }

    #[test]
    fn test_find_by_code_or_name() {
        let mut chart = ChartOfAccounts::new();
        chart.insert(NewAccount::new("1010", "Petty Cash", AccountType::Asset)).unwrap();
        chart.insert(NewAccount::new("1020", "Cash at Bank", AccountType::Asset)).unwrap();

        assert_eq!(
            chart.find_by_code_or_name("1000", "cash").map(|a| a.code.as_str()),
            Some("1010")
        );

        chart.insert(NewAccount::new("1000", "Main Account", AccountType::Asset)).unwrap();
        assert_eq!(
            chart.find_by_code_or_name("1000", "cash").map(|a| a.code.as_str()),
            Some("1000")
        );
    }
}
