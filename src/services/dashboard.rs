//! Dashboard service
//!
//! Loads every dashboard section concurrently. Each section keeps its own
//! result, so a failed read leaves the other sections intact.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::backend::{Backend, Collection, Query};
use crate::error::FintrackResult;
use crate::models::{Account, CategoryType, Transaction};
use crate::reports::{
    category_breakdown, monthly_series, BudgetProgress, CategoryTotal, FinancialOverview,
    GoalProgress, MonthlyTotals, DEFAULT_TOP_CATEGORIES,
};
use crate::storage::{ResourceKey, Storage};

use super::transaction::RECENT_LIMIT;
use super::{AccountService, BudgetService, CategoryService, GoalService, TransactionService};

/// Every section of the dashboard
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub overview: FintrackResult<FinancialOverview>,
    pub recent: FintrackResult<Vec<Transaction>>,
    pub budgets: FintrackResult<Vec<BudgetProgress>>,
    pub goals: FintrackResult<Vec<GoalProgress>>,
    /// Expense chart data, largest categories first
    pub expense_by_category: FintrackResult<Vec<CategoryTotal>>,
    /// Income and expense per month, oldest first
    pub monthly: FintrackResult<Vec<MonthlyTotals>>,
}

impl Dashboard {
    /// Number of sections that failed to load
    pub fn failed_sections(&self) -> usize {
        [
            self.overview.is_err(),
            self.recent.is_err(),
            self.budgets.is_err(),
            self.goals.is_err(),
            self.expense_by_category.is_err(),
            self.monthly.is_err(),
        ]
        .into_iter()
        .filter(|failed| *failed)
        .count()
    }
}

pub struct DashboardService<'a, B: Backend> {
    storage: &'a Storage<B>,
}

impl<'a, B: Backend> DashboardService<'a, B> {
    pub fn new(storage: &'a Storage<B>) -> Self {
        Self { storage }
    }

    /// Headline numbers: balance over active accounts and this month's
    /// income and expenses
    pub async fn financial_summary(&self, today: NaiveDate) -> FintrackResult<FinancialOverview> {
        self.storage
            .cached(ResourceKey::FinancialSummary, || async move {
                let month_start = today.with_day(1).unwrap_or(today);
                let account_service = AccountService::new(self.storage);
                let (accounts, transactions) = tokio::join!(
                    account_service.list(),
                    self.storage.select_as::<Transaction>(
                        Query::from(Collection::Transactions)
                            .gte("transaction_date", month_start.to_string())
                    ),
                );
                let accounts: Vec<Account> = accounts?;
                Ok(FinancialOverview::compute(&accounts, &transactions?, today))
            })
            .await
    }

    /// Load every section at once
    pub async fn load(&self, today: NaiveDate) -> Dashboard {
        let transactions = TransactionService::new(self.storage);
        let budget_service = BudgetService::new(self.storage);
        let goal_service = GoalService::new(self.storage);
        let category_service = CategoryService::new(self.storage);
        let (overview, recent, budgets, goals, all, categories) = tokio::join!(
            self.financial_summary(today),
            transactions.recent(RECENT_LIMIT),
            budget_service.list(),
            goal_service.list_with_progress(),
            transactions.all(),
            category_service.list(Some(CategoryType::Expense)),
        );

        let budgets = budgets.and_then(|budgets| {
            let all = all.as_ref().map_err(Clone::clone)?;
            Ok(budgets
                .iter()
                .map(|b| BudgetProgress::compute(b, all))
                .collect())
        });

        // A failed category read only loses the names, not the totals
        let categories = categories.unwrap_or_else(|err| {
            warn!(%err, "categories unavailable, expense chart will be uncategorized");
            Vec::new()
        });
        let expense_by_category = all
            .as_ref()
            .map(|all| category_breakdown(all, &categories, DEFAULT_TOP_CATEGORIES))
            .map_err(Clone::clone);
        let monthly = all.as_ref().map(|all| monthly_series(all)).map_err(Clone::clone);

        let dashboard = Dashboard {
            today,
            overview,
            recent,
            budgets,
            goals,
            expense_by_category,
            monthly,
        };
        debug!(failed = dashboard.failed_sections(), "dashboard loaded");
        dashboard
    }
}
