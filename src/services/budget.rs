//! Budget service
//!
//! Budgets cap expense spending in one category over a date period.
//! Progress is always recomputed from transactions rather than read from
//! the stored `spent` column.

use chrono::NaiveDate;
use tracing::info;

use crate::backend::{Backend, Collection, Query};
use crate::error::{FintrackError, FintrackResult};
use crate::models::dates::parse_flexible;
use crate::models::{Budget, CategoryType, NewBudget};
use crate::reports::BudgetProgress;
use crate::storage::{ResourceKey, Storage};
use crate::validation::{BudgetForm, Form, ValidationErrors};

use super::{parse_amount, CategoryService, TransactionService};

/// Service for budget management
pub struct BudgetService<'a, B: Backend> {
    storage: &'a Storage<B>,
}

impl<'a, B: Backend> BudgetService<'a, B> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage<B>) -> Self {
        Self { storage }
    }

    /// Create a budget for an expense category
    pub async fn create(&self, form: &BudgetForm) -> FintrackResult<Budget> {
        form.validate()?;
        let user_id = self.storage.require_user()?;

        let category = CategoryService::new(self.storage)
            .resolve(&form.category, Some(CategoryType::Expense))
            .await?;

        let new = NewBudget {
            user_id,
            name: form.name.trim().to_string(),
            category_id: category.id,
            amount: parse_amount("amount", &form.amount)?,
            period_start: parse_required_date("period_start", &form.period_start)?,
            period_end: parse_required_date("period_end", &form.period_end)?,
        };
        new.validate()
            .map_err(|e| ValidationErrors::single("period_end", e.to_string()))?;

        let budget: Budget = self.storage.insert_one(Collection::Budgets, &new).await?;
        info!(budget = %budget.name, category = %category.name, "budget created");
        self.storage.invalidate(&[ResourceKey::Budgets]);
        Ok(budget)
    }

    /// Active budgets, newest first
    pub async fn list(&self) -> FintrackResult<Vec<Budget>> {
        self.storage
            .cached(ResourceKey::Budgets, || {
                self.storage.select_as(
                    Query::from(Collection::Budgets)
                        .eq("is_active", true)
                        .order_by("created_at", false),
                )
            })
            .await
    }

    /// Active budgets with spending recomputed from every transaction
    pub async fn list_with_progress(&self) -> FintrackResult<Vec<BudgetProgress>> {
        let transactions = TransactionService::new(self.storage);
        let (budgets, transactions) = tokio::join!(self.list(), transactions.all());
        let (budgets, transactions) = (budgets?, transactions?);
        Ok(budgets
            .iter()
            .map(|b| BudgetProgress::compute(b, &transactions))
            .collect())
    }

    /// Find an active budget by name or ID string
    pub async fn find(&self, identifier: &str) -> FintrackResult<Option<Budget>> {
        let budgets = self.list().await?;
        let identifier = identifier.trim();
        Ok(budgets
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(identifier))
            .or_else(|| budgets.iter().find(|b| b.id.matches(identifier)))
            .cloned())
    }

    /// Delete a budget
    pub async fn delete(&self, identifier: &str) -> FintrackResult<Budget> {
        self.storage.require_user()?;
        let budget = self
            .find(identifier)
            .await?
            .ok_or_else(|| FintrackError::budget_not_found(identifier.trim()))?;

        if !self
            .storage
            .delete_by_id(Collection::Budgets, budget.id.as_uuid())
            .await?
        {
            return Err(FintrackError::budget_not_found(budget.id.to_string()));
        }
        info!(budget = %budget.name, "budget deleted");
        self.storage.invalidate(&[ResourceKey::Budgets]);
        Ok(budget)
    }
}

fn parse_required_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationErrors> {
    parse_flexible(raw).ok_or_else(|| ValidationErrors::single(field, "Invalid date."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::services::test_support::storage;
    use crate::services::AccountService;
    use crate::validation::{AccountForm, TransactionForm};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn setup(storage: &Storage<MemoryBackend>) {
        AccountService::new(storage)
            .create(&AccountForm {
                name: "Checking".into(),
                ..AccountForm::default()
            })
            .await
            .unwrap();
        let categories = CategoryService::new(storage);
        categories.create("Groceries", CategoryType::Expense, None).await.unwrap();
        categories.create("Dining", CategoryType::Expense, None).await.unwrap();
        categories.create("Salary", CategoryType::Income, None).await.unwrap();
    }

    fn form(name: &str, amount: &str) -> BudgetForm {
        BudgetForm {
            name: name.into(),
            amount: amount.into(),
            category: "Groceries".into(),
            ..BudgetForm::with_default_period(date("2025-03-01"))
        }
    }

    async fn spend(storage: &Storage<MemoryBackend>, category: &str, amount: &str, on: &str) {
        TransactionService::new(storage)
            .add(
                &TransactionForm {
                    description: "Spend".into(),
                    amount: amount.into(),
                    transaction_type: "expense".into(),
                    account: "Checking".into(),
                    category: category.into(),
                    date: Some(on.into()),
                    notes: None,
                },
                date(on),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_with_default_period() {
        let storage = storage();
        setup(&storage).await;
        let budget = BudgetService::new(&storage)
            .create(&form("Food", "400"))
            .await
            .unwrap();

        assert_eq!(budget.amount.cents(), 40000);
        assert_eq!(budget.period_start, date("2025-03-01"));
        assert_eq!(budget.period_end, date("2025-03-31"));
        assert!(budget.is_active());
    }

    #[tokio::test]
    async fn test_end_before_start_rejected() {
        let storage = storage();
        setup(&storage).await;
        let mut bad = form("Food", "400");
        bad.period_end = "2025-02-01".into();

        let err = BudgetService::new(&storage).create(&bad).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(storage.backend().row_count(Collection::Budgets), 0);
    }

    #[tokio::test]
    async fn test_income_category_rejected() {
        let storage = storage();
        setup(&storage).await;
        let mut bad = form("Pay", "400");
        bad.category = "Salary".into();

        let err = BudgetService::new(&storage).create(&bad).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_progress_counts_only_matching_expenses() {
        let storage = storage();
        setup(&storage).await;
        let service = BudgetService::new(&storage);
        service.create(&form("Food", "200")).await.unwrap();

        spend(&storage, "Groceries", "150", "2025-03-05").await;
        spend(&storage, "Groceries", "100", "2025-03-20").await;
        spend(&storage, "Groceries", "999", "2025-04-01").await;
        spend(&storage, "Dining", "999", "2025-03-10").await;

        let progress = service.list_with_progress().await.unwrap();
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].spent.cents(), 25000);
        assert_eq!(progress[0].remaining.cents(), -5000);
        assert!(progress[0].over_budget);
    }

    #[tokio::test]
    async fn test_list_newest_first_and_delete() {
        let storage = storage();
        setup(&storage).await;
        let service = BudgetService::new(&storage);
        service.create(&form("First", "100")).await.unwrap();
        service.create(&form("Second", "100")).await.unwrap();

        let names: Vec<String> = service.list().await.unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"First".to_string()));

        service.delete("first").await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 1);
        assert!(service.delete("first").await.unwrap_err().is_not_found());
    }
}
