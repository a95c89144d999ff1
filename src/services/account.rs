//! Account service
//!
//! Account CRUD over the backend. Accounts are never deleted; deactivating
//! one hides it from lists and from the balance total.

use serde_json::json;
use tracing::info;

use crate::backend::{Backend, Collection, Query};
use crate::error::{FintrackError, FintrackResult};
use crate::models::account::DEFAULT_CURRENCY;
use crate::models::{Account, AccountId, AccountType, Money, NewAccount};
use crate::storage::{ResourceKey, Storage};
use crate::validation::{AccountForm, Form, ValidationErrors};

use super::{non_blank, parse_amount};

/// Service for account management
pub struct AccountService<'a, B: Backend> {
    storage: &'a Storage<B>,
}

impl<'a, B: Backend> AccountService<'a, B> {
    /// Create a new account service
    pub fn new(storage: &'a Storage<B>) -> Self {
        Self { storage }
    }

    /// Create a new account from a validated form
    pub async fn create(&self, form: &AccountForm) -> FintrackResult<Account> {
        form.validate()?;
        let user_id = self.storage.require_user()?;

        let name = form.name.trim();
        if self.get_by_name(name).await?.is_some() {
            return Err(ValidationErrors::single(
                "name",
                format!("An account named '{}' already exists.", name),
            )
            .into());
        }

        let account_type = AccountType::parse(&form.account_type)
            .ok_or_else(|| ValidationErrors::single("type", "Unknown account type."))?;
        let balance = if form.balance.trim().is_empty() {
            Money::zero()
        } else {
            parse_amount("balance", &form.balance)?
        };
        let currency = match form.currency.trim() {
            "" => DEFAULT_CURRENCY.to_string(),
            c => c.to_uppercase(),
        };

        let new = NewAccount {
            user_id,
            name: name.to_string(),
            account_type,
            balance,
            currency,
            description: non_blank(form.description.as_deref()),
        };

        let account: Account = self.storage.insert_one(Collection::Accounts, &new).await?;
        self.storage
            .invalidate(&[ResourceKey::Accounts, ResourceKey::FinancialSummary]);
        Ok(account)
    }

    /// Active accounts, served from the cache
    pub async fn list(&self) -> FintrackResult<Vec<Account>> {
        self.storage
            .cached(ResourceKey::Accounts, || {
                self.storage.select_as(
                    Query::from(Collection::Accounts)
                        .eq("is_active", true)
                        .order_by("name", true),
                )
            })
            .await
    }

    /// Every account, including deactivated ones
    pub async fn list_all(&self) -> FintrackResult<Vec<Account>> {
        self.storage
            .select_as(Query::from(Collection::Accounts).order_by("name", true))
            .await
    }

    /// Get an account by ID, active or not
    pub async fn get(&self, id: AccountId) -> FintrackResult<Option<Account>> {
        let mut rows: Vec<Account> = self
            .storage
            .select_as(Query::from(Collection::Accounts).eq("id", id.as_uuid().to_string()))
            .await?;
        Ok(rows.pop())
    }

    /// Get an active account by name (case-insensitive)
    pub async fn get_by_name(&self, name: &str) -> FintrackResult<Option<Account>> {
        let name = name.trim();
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|a| a.name.eq_ignore_ascii_case(name)))
    }

    /// Find an active account by name or ID string
    pub async fn find(&self, identifier: &str) -> FintrackResult<Option<Account>> {
        let accounts = self.list().await?;
        let identifier = identifier.trim();
        Ok(accounts
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(identifier))
            .or_else(|| accounts.iter().find(|a| a.id.matches(identifier)))
            .cloned())
    }

    /// Like [`find`](Self::find), but a missing account is an error
    pub async fn resolve(&self, identifier: &str) -> FintrackResult<Account> {
        self.find(identifier)
            .await?
            .ok_or_else(|| FintrackError::account_not_found(identifier.trim()))
    }

    /// Soft-delete an account
    pub async fn deactivate(&self, identifier: &str) -> FintrackResult<Account> {
        self.storage.require_user()?;
        let account = self.resolve(identifier).await?;

        let updated: Account = self
            .storage
            .update_by_id(
                Collection::Accounts,
                account.id.as_uuid(),
                json!({ "is_active": false }),
            )
            .await?
            .ok_or_else(|| FintrackError::account_not_found(account.id.to_string()))?;

        info!(account = %updated.id, "account deactivated");
        self.storage
            .invalidate(&[ResourceKey::Accounts, ResourceKey::FinancialSummary]);
        Ok(updated)
    }
}
