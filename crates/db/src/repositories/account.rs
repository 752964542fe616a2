//! Account repository for chart of accounts operations.

use tally_core::ledger::{Account, AccountStatus, AccountType, LedgerError, NewAccount};
use tally_shared::AppError;
use tally_shared::types::AccountId;
use tracing::info;

use crate::store::{Database, DbError};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountRepoError {
    /// Chart rule violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<AccountRepoError> for AppError {
    fn from(err: AccountRepoError) -> Self {
        match err {
            AccountRepoError::Ledger(e) => e.into(),
            AccountRepoError::Database(e) => e.into(),
        }
    }
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: Database,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Creates an account with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is taken or the parent does not exist.
    pub fn create_account(&self, input: NewAccount) -> Result<Account, AccountRepoError> {
        let account = self
            .db
            .transaction(|t| t.chart_mut().insert(input).map_err(AccountRepoError::from))?;
        info!(account_id = %account.id, code = %account.code, "Account created");
        Ok(account)
    }

    /// Returns the account with `code`, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn find_or_create(
        &self,
        code: &str,
        name: &str,
        account_type: AccountType,
    ) -> Result<Account, AccountRepoError> {
        self.db.transaction(|t| {
            let id = t.chart_mut().find_or_create(code, name, account_type)?;
            Ok::<_, AccountRepoError>(t.chart().require(id)?.clone())
        })
    }

    /// Creates a per-counterparty account under a control account.
    ///
    /// # Errors
    ///
    /// Returns an error if the control account does not exist.
    pub fn create_sub_ledger_account(
        &self,
        parent_code: &str,
        name: &str,
        sub_type: &str,
    ) -> Result<Account, AccountRepoError> {
        let account = self.db.transaction(|t| {
            t.chart_mut()
                .create_sub_ledger_account(parent_code, name, sub_type)
                .map_err(AccountRepoError::from)
        })?;
        info!(
            account_id = %account.id,
            code = %account.code,
            parent_code,
            "Sub-ledger account created"
        );
        Ok(account)
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountRepoError> {
        Ok(self.db.read(|t| t.chart().get(id).cloned())?)
    }

    /// Finds an account by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn find_by_code(&self, code: &str) -> Result<Option<Account>, AccountRepoError> {
        Ok(self.db.read(|t| t.chart().find_by_code(code).cloned())?)
    }

    /// Lists accounts ordered by code, optionally of one type.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn list_accounts(
        &self,
        account_type: Option<AccountType>,
    ) -> Result<Vec<Account>, AccountRepoError> {
        Ok(self.db.read(|t| {
            t.chart()
                .sorted_by_code()
                .into_iter()
                .filter(|a| account_type.is_none_or(|ty| a.account_type == ty))
                .cloned()
                .collect()
        })?)
    }

    /// Updates an account's name and sub-type.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist.
    pub fn update_account(
        &self,
        id: AccountId,
        name: &str,
        sub_type: Option<String>,
    ) -> Result<Account, AccountRepoError> {
        self.db.transaction(|t| {
            Ok::<_, AccountRepoError>(t.chart_mut().rename(id, name, sub_type)?.clone())
        })
    }

    /// Assigns or clears an account's parent.
    ///
    /// # Errors
    ///
    /// Returns an error if either account is missing or the assignment
    /// would create a cycle.
    pub fn set_parent(
        &self,
        id: AccountId,
        parent_id: Option<AccountId>,
    ) -> Result<(), AccountRepoError> {
        self.db.transaction(|t| {
            t.chart_mut()
                .set_parent(id, parent_id)
                .map_err(AccountRepoError::from)
        })
    }

    /// Activates or deactivates an account. Inactive accounts reject new
    /// postings and keep their balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist.
    pub fn set_status(
        &self,
        id: AccountId,
        status: AccountStatus,
    ) -> Result<Account, AccountRepoError> {
        let account = self.db.transaction(|t| {
            t.chart_mut().set_status(id, status)?;
            Ok::<_, AccountRepoError>(t.chart().require(id)?.clone())
        })?;
        info!(account_id = %id, status = ?account.status, "Account status changed");
        Ok(account)
    }

    /// Deletes an account no journal line references.
    ///
    /// # Errors
    ///
    /// `AccountInUse` if any journal line references the account,
    /// `AccountHasChildren` if it has sub-accounts.
    pub fn delete_account(&self, id: AccountId) -> Result<(), AccountRepoError> {
        self.db.transaction(|t| {
            if t.journals().iter().any(|j| j.touches(id)) {
                return Err(AccountRepoError::from(LedgerError::AccountInUse(id)));
            }
            t.chart_mut().remove(id)?;
            Ok::<_, AccountRepoError>(())
        })?;
        info!(account_id = %id, "Account deleted");
        Ok(())
    }

    /// Ancestors of an account, nearest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist.
    pub fn ancestors(&self, id: AccountId) -> Result<Vec<Account>, AccountRepoError> {
        Ok(self
            .db
            .read(|t| t.chart().ancestors(id).map(|a| a.into_iter().cloned().collect()))??)
    }

    /// Direct children of an account, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    pub fn children(&self, id: AccountId) -> Result<Vec<Account>, AccountRepoError> {
        Ok(self
            .db
            .read(|t| t.chart().children(id).into_iter().cloned().collect())?)
    }
}
