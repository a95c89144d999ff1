//! Transaction service
//!
//! Records income and expense entries. The form carries an unsigned
//! amount; the stored amount is signed by type (income positive, expense
//! negative). Account balances are not adjusted here.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::backend::{Backend, Collection, Query};
use crate::error::{FintrackError, FintrackResult};
use crate::models::{CategoryType, NewTransaction, Transaction, TransactionType};
use crate::reports::DateRange;
use crate::storage::{ResourceKey, Storage};
use crate::validation::{Form, TransactionForm, ValidationErrors};

use super::{non_blank, parse_amount, parse_date_or, AccountService, CategoryService};

/// Number of rows the dashboard shows as "recent"
pub const RECENT_LIMIT: usize = 5;

/// Service for transaction management
pub struct TransactionService<'a, B: Backend> {
    storage: &'a Storage<B>,
}

impl<'a, B: Backend> TransactionService<'a, B> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage<B>) -> Self {
        Self { storage }
    }

    /// Record an income or expense entry
    ///
    /// The date defaults to `today` when the form leaves it blank.
    pub async fn add(&self, form: &TransactionForm, today: NaiveDate) -> FintrackResult<Transaction> {
        form.validate()?;
        let user_id = self.storage.require_user()?;

        let transaction_type = TransactionType::parse(&form.transaction_type)
            .filter(|t| *t != TransactionType::Transfer)
            .ok_or_else(|| ValidationErrors::single("type", "Type must be one of: income, expense."))?;
        let category_type = match transaction_type {
            TransactionType::Income => CategoryType::Income,
            _ => CategoryType::Expense,
        };

        let account = AccountService::new(self.storage)
            .resolve(&form.account)
            .await?;
        let category = CategoryService::new(self.storage)
            .resolve(&form.category, Some(category_type))
            .await?;

        let magnitude = parse_amount("amount", &form.amount)?;
        let new = NewTransaction {
            user_id,
            account_id: account.id,
            to_account_id: None,
            category_id: Some(category.id),
            amount: transaction_type.signed(magnitude),
            transaction_type,
            transaction_date: parse_date_or("date", form.date.as_deref(), today)?,
            description: non_blank(Some(&form.description)),
            notes: non_blank(form.notes.as_deref()),
        };
        new.validate()
            .map_err(|e| ValidationErrors::single("amount", e.to_string()))?;

        let transaction: Transaction = self
            .storage
            .insert_one(Collection::Transactions, &new)
            .await?;
        info!(
            id = %transaction.id,
            account = %account.name,
            amount = %transaction.amount,
            "transaction recorded"
        );
        self.storage.invalidate(&ResourceKey::TRANSACTION_WRITES);
        Ok(transaction)
    }

    /// The most recent transactions, newest first
    ///
    /// Only the default page size is cached.
    pub async fn recent(&self, limit: usize) -> FintrackResult<Vec<Transaction>> {
        let query = Query::from(Collection::Transactions)
            .order_by("transaction_date", false)
            .limit(limit);
        if limit != RECENT_LIMIT {
            return self.storage.select_as(query).await;
        }
        self.storage
            .cached(ResourceKey::RecentTransactions, || {
                self.storage.select_as(query)
            })
            .await
    }

    /// Every transaction, newest first
    pub async fn all(&self) -> FintrackResult<Vec<Transaction>> {
        self.storage
            .cached(ResourceKey::AllTransactions, || {
                self.storage.select_as(
                    Query::from(Collection::Transactions).order_by("transaction_date", false),
                )
            })
            .await
    }

    /// Transactions dated within `range` (inclusive), newest first
    pub async fn in_range(&self, range: DateRange) -> FintrackResult<Vec<Transaction>> {
        debug!(from = %range.from, to = %range.to, "loading transactions in range");
        self.storage
            .select_as(
                Query::from(Collection::Transactions)
                    .gte("transaction_date", range.from.to_string())
                    .lte("transaction_date", range.to.to_string())
                    .order_by("transaction_date", false),
            )
            .await
    }

    /// Transactions on one account, newest first
    pub async fn for_account(&self, account: &str) -> FintrackResult<Vec<Transaction>> {
        let account = AccountService::new(self.storage).resolve(account).await?;
        self.storage
            .select_as(
                Query::from(Collection::Transactions)
                    .eq("account_id", account.id.as_uuid().to_string())
                    .order_by("transaction_date", false),
            )
            .await
    }

    /// Delete a transaction by ID string, returning every removed row
    ///
    /// A transfer leg is removed together with its opposite leg. When the
    /// opposite leg cannot be found nothing is deleted.
    pub async fn delete(&self, identifier: &str) -> FintrackResult<Vec<Transaction>> {
        self.storage.require_user()?;
        let identifier = identifier.trim();
        let all = self.all().await?;
        let transaction = all
            .iter()
            .find(|t| t.id.matches(identifier))
            .ok_or_else(|| FintrackError::transaction_not_found(identifier))?;

        let mut targets = vec![transaction.clone()];
        if transaction.is_transfer() {
            let partner = all
                .iter()
                .find(|t| transaction.pairs_with(t))
                .ok_or_else(|| {
                    FintrackError::transaction_not_found(format!(
                        "other leg of transfer {}",
                        transaction.id
                    ))
                })?;
            targets.push(partner.clone());
        }

        let result = self.delete_rows(&targets).await;
        self.storage.invalidate(&ResourceKey::TRANSACTION_WRITES);
        result.map(|()| targets)
    }

    async fn delete_rows(&self, rows: &[Transaction]) -> FintrackResult<()> {
        for row in rows {
            let deleted = self
                .storage
                .delete_by_id(Collection::Transactions, row.id.as_uuid())
                .await?;
            if !deleted {
                return Err(FintrackError::transaction_not_found(row.id.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::services::test_support::storage;
    use crate::services::TransferService;
    use crate::validation::{AccountForm, TransferForm};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn setup(storage: &Storage<crate::backend::MemoryBackend>) {
        AccountService::new(storage)
            .create(&AccountForm {
                name: "Checking".into(),
                ..AccountForm::default()
            })
            .await
            .unwrap();
        let categories = CategoryService::new(storage);
        categories.create("Groceries", CategoryType::Expense, None).await.unwrap();
        categories.create("Salary", CategoryType::Income, None).await.unwrap();
    }

    fn expense(amount: &str, date: Option<&str>) -> TransactionForm {
        TransactionForm {
            description: "Weekly shop".into(),
            amount: amount.into(),
            transaction_type: "expense".into(),
            account: "Checking".into(),
            category: "Groceries".into(),
            date: date.map(String::from),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_expense_is_stored_negative() {
        let storage = storage();
        setup(&storage).await;
        let service = TransactionService::new(&storage);

        let txn = service
            .add(&expense("42.50", None), date("2025-03-15"))
            .await
            .unwrap();
        assert_eq!(txn.amount.cents(), -4250);
        assert_eq!(txn.transaction_date, date("2025-03-15"));
        assert_eq!(txn.description(), "Weekly shop");
    }

    #[tokio::test]
    async fn test_income_is_stored_positive() {
        let storage = storage();
        setup(&storage).await;
        let service = TransactionService::new(&storage);

        let form = TransactionForm {
            transaction_type: "income".into(),
            category: "Salary".into(),
            date: Some("2025-03-01".into()),
            ..expense("3000", None)
        };
        let txn = service.add(&form, date("2025-03-15")).await.unwrap();
        assert_eq!(txn.amount.cents(), 300000);
        assert!(txn.is_income());
        assert_eq!(txn.transaction_date, date("2025-03-01"));
    }

    #[tokio::test]
    async fn test_category_must_match_type() {
        let storage = storage();
        setup(&storage).await;
        let service = TransactionService::new(&storage);

        let form = TransactionForm {
            category: "Salary".into(),
            ..expense("10", None)
        };
        let err = service.add(&form, date("2025-03-15")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_invalid_form_reports_every_field() {
        let storage = storage();
        setup(&storage).await;
        let service = TransactionService::new(&storage);

        let form = TransactionForm {
            description: "x".into(),
            amount: "-5".into(),
            ..expense("0", None)
        };
        match service.add(&form, date("2025-03-15")).await.unwrap_err() {
            FintrackError::Validation(errors) => {
                assert_eq!(
                    errors.get("description"),
                    Some("Description must be at least 2 characters.")
                );
                assert_eq!(errors.get("amount"), Some("Amount must be positive."));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(storage.backend().row_count(Collection::Transactions), 0);
    }

    #[tokio::test]
    async fn test_recent_is_newest_first_and_limited() {
        let storage = storage();
        setup(&storage).await;
        let service = TransactionService::new(&storage);

        for day in 1..=7 {
            let d = format!("2025-03-0{}", day);
            service
                .add(&expense("1", Some(&d)), date("2025-03-15"))
                .await
                .unwrap();
        }

        let recent = service.recent(RECENT_LIMIT).await.unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].transaction_date, date("2025-03-07"));
        assert_eq!(recent[4].transaction_date, date("2025-03-03"));
        assert_eq!(service.all().await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_add_invalidates_cached_reads() {
        let storage = storage();
        setup(&storage).await;
        let service = TransactionService::new(&storage);

        assert!(service.recent(RECENT_LIMIT).await.unwrap().is_empty());
        assert!(service.all().await.unwrap().is_empty());

        service.add(&expense("5", None), date("2025-03-15")).await.unwrap();
        assert_eq!(service.recent(RECENT_LIMIT).await.unwrap().len(), 1);
        assert_eq!(service.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_in_range_is_inclusive() {
        let storage = storage();
        setup(&storage).await;
        let service = TransactionService::new(&storage);
        for d in ["2025-02-28", "2025-03-01", "2025-03-31", "2025-04-01"] {
            service
                .add(&expense("1", Some(d)), date("2025-03-15"))
                .await
                .unwrap();
        }

        let range = DateRange::new(date("2025-03-01"), date("2025-03-31")).unwrap();
        let rows = service.in_range(range).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let storage = storage();
        setup(&storage).await;
        let service = TransactionService::new(&storage);
        let txn = service.add(&expense("5", None), date("2025-03-15")).await.unwrap();

        let deleted = service.delete(&txn.id.to_string()).await.unwrap();
        assert_eq!(deleted.len(), 1);
        assert!(service.all().await.unwrap().is_empty());
        assert!(service.delete(&txn.id.to_string()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_deleting_a_transfer_leg_removes_both_legs() {
        let storage = storage();
        setup(&storage).await;
        AccountService::new(&storage)
            .create(&AccountForm {
                name: "Savings".into(),
                ..AccountForm::default()
            })
            .await
            .unwrap();
        let transfer = TransferService::new(&storage)
            .transfer(
                &TransferForm {
                    description: "Rainy day".into(),
                    amount: "250".into(),
                    from_account: "Checking".into(),
                    to_account: "Savings".into(),
                    date: None,
                },
                date("2025-03-15"),
            )
            .await
            .unwrap();
        let service = TransactionService::new(&storage);

        let deleted = service.delete(&transfer.outgoing.id.to_string()).await.unwrap();
        assert_eq!(deleted.len(), 2);
        assert_eq!(deleted.iter().map(|t| t.amount).sum::<Money>(), Money::zero());
        assert!(service.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_leg_without_partner_is_kept() {
        let storage = storage();
        setup(&storage).await;
        AccountService::new(&storage)
            .create(&AccountForm {
                name: "Savings".into(),
                ..AccountForm::default()
            })
            .await
            .unwrap();
        let transfer = TransferService::new(&storage)
            .transfer(
                &TransferForm {
                    description: "Rainy day".into(),
                    amount: "250".into(),
                    from_account: "Checking".into(),
                    to_account: "Savings".into(),
                    date: None,
                },
                date("2025-03-15"),
            )
            .await
            .unwrap();
        storage
            .delete_by_id(Collection::Transactions, transfer.incoming.id.as_uuid())
            .await
            .unwrap();
        let service = TransactionService::new(&storage);

        let err = service
            .delete(&transfer.outgoing.id.to_string())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(storage.backend().row_count(Collection::Transactions), 1);
    }
}
