//! Budget and savings goal progress
//!
//! Percentages are `None` when the limit or target is zero, so callers
//! never see NaN or infinity. Progress bars treat `None` as empty.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{
    Budget, BudgetId, CategoryId, GoalId, GoalStatus, Money, SavingsGoal, Transaction,
};

/// `part * 100 / whole`, or `None` when `whole` is not positive
pub fn percentage(part: Money, whole: Money) -> Option<f64> {
    if !whole.is_positive() {
        return None;
    }
    Some(part.cents() as f64 * 100.0 / whole.cents() as f64)
}

/// Fill fraction for a progress bar, clamped to 0.0..=1.0
pub fn bar_fraction(percentage: Option<f64>) -> f64 {
    percentage.map_or(0.0, |p| (p / 100.0).clamp(0.0, 1.0))
}

/// Absolute expense total for one category within an inclusive period
pub fn spent_in_period(
    transactions: &[Transaction],
    category_id: CategoryId,
    start: NaiveDate,
    end: NaiveDate,
) -> Money {
    transactions
        .iter()
        .filter(|t| {
            t.is_expense()
                && t.category_id == Some(category_id)
                && t.transaction_date >= start
                && t.transaction_date <= end
        })
        .map(|t| t.amount.abs())
        .sum()
}

/// Progress of one budget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub budget_id: BudgetId,
    pub name: String,
    pub category_id: CategoryId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub amount: Money,
    pub spent: Money,
    /// May be negative when over budget
    pub remaining: Money,
    pub percentage: Option<f64>,
    pub over_budget: bool,
}

impl BudgetProgress {
    /// Compute progress with spent recomputed from `transactions`
    pub fn compute(budget: &Budget, transactions: &[Transaction]) -> Self {
        let spent = spent_in_period(
            transactions,
            budget.category_id,
            budget.period_start,
            budget.period_end,
        );
        Self::from_spent(budget, spent)
    }

    pub fn from_spent(budget: &Budget, spent: Money) -> Self {
        Self {
            budget_id: budget.id,
            name: budget.name.clone(),
            category_id: budget.category_id,
            period_start: budget.period_start,
            period_end: budget.period_end,
            amount: budget.amount,
            spent,
            remaining: budget.amount - spent,
            percentage: percentage(spent, budget.amount),
            over_budget: spent > budget.amount,
        }
    }

    pub fn bar_fraction(&self) -> f64 {
        bar_fraction(self.percentage)
    }
}

/// Progress of one savings goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub goal_id: GoalId,
    pub name: String,
    pub status: GoalStatus,
    pub target_date: Option<NaiveDate>,
    pub target: Money,
    pub current: Money,
    /// May be negative once the target is exceeded
    pub remaining: Money,
    /// May exceed 100
    pub percentage: Option<f64>,
}

impl GoalProgress {
    pub fn compute(goal: &SavingsGoal) -> Self {
        let current = goal.current();
        Self {
            goal_id: goal.id,
            name: goal.name.clone(),
            status: goal.status(),
            target_date: goal.target_date,
            target: goal.target_amount,
            current,
            remaining: goal.target_amount - current,
            percentage: percentage(current, goal.target_amount),
        }
    }

    pub fn bar_fraction(&self) -> f64 {
        bar_fraction(self.percentage)
    }

    /// Days left until the target date, negative once it has passed
    pub fn days_left(&self, today: NaiveDate) -> Option<i64> {
        self.target_date.map(|d| (d - today).num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use crate::reports::test_support::{budget, goal, txn};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_over_budget_example() {
        let b = budget(20000, "2025-01-01", "2025-01-31");
        let transactions = vec![txn(
            "2025-01-15",
            TransactionType::Expense,
            -25000,
            Some(b.category_id),
        )];

        let progress = BudgetProgress::compute(&b, &transactions);
        assert!(progress.over_budget);
        assert_eq!(progress.remaining.cents(), -5000);
        assert_eq!(progress.percentage, Some(125.0));
        assert_eq!(progress.bar_fraction(), 1.0);
    }

    #[test]
    fn test_spent_ignores_other_categories_and_dates() {
        let b = budget(20000, "2025-01-01", "2025-01-31");
        let transactions = vec![
            txn("2025-01-01", TransactionType::Expense, -1000, Some(b.category_id)),
            txn("2025-01-31", TransactionType::Expense, -500, Some(b.category_id)),
            txn("2025-02-01", TransactionType::Expense, -9999, Some(b.category_id)),
            txn("2025-01-10", TransactionType::Expense, -9999, Some(CategoryId::new())),
            txn("2025-01-10", TransactionType::Income, 9999, Some(b.category_id)),
        ];
        let progress = BudgetProgress::compute(&b, &transactions);
        assert_eq!(progress.spent.cents(), 1500);
        assert!(!progress.over_budget);
    }

    #[test]
    fn test_stored_spent_is_not_trusted() {
        let mut b = budget(20000, "2025-01-01", "2025-01-31");
        b.spent = Some(Money::from_cents(19000));
        let progress = BudgetProgress::compute(&b, &[]);
        assert_eq!(progress.spent, Money::zero());
    }

    #[test]
    fn test_zero_amount_has_no_percentage() {
        let b = budget(0, "2025-01-01", "2025-01-31");
        let progress = BudgetProgress::from_spent(&b, Money::from_cents(100));
        assert_eq!(progress.percentage, None);
        assert_eq!(progress.bar_fraction(), 0.0);
        assert!(progress.over_budget);
    }

    #[test]
    fn test_goal_example() {
        let g = goal(100000, Some(25000));
        let progress = GoalProgress::compute(&g);
        assert_eq!(progress.percentage, Some(25.0));
        assert_eq!(progress.remaining.cents(), 75000);
        assert!((progress.bar_fraction() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_goal_may_exceed_target() {
        let progress = GoalProgress::compute(&goal(1000, Some(1500)));
        assert_eq!(progress.percentage, Some(150.0));
        assert_eq!(progress.bar_fraction(), 1.0);
        assert_eq!(progress.remaining.cents(), -500);
    }

    #[test]
    fn test_goal_missing_current_amount() {
        let progress = GoalProgress::compute(&goal(1000, None));
        assert_eq!(progress.current, Money::zero());
        assert_eq!(progress.percentage, Some(0.0));
    }

    #[test]
    fn test_days_left() {
        let mut g = goal(1000, None);
        g.target_date = Some(date("2025-01-31"));
        let progress = GoalProgress::compute(&g);
        assert_eq!(progress.days_left(date("2025-01-21")), Some(10));
    }

    #[test]
    fn test_percentage_helper() {
        assert_eq!(percentage(Money::from_cents(50), Money::from_cents(200)), Some(25.0));
        assert_eq!(
            percentage(Money::from_cents(115_000), Money::from_cents(100_000)),
            Some(115.0)
        );
        assert_eq!(percentage(Money::from_cents(50), Money::zero()), None);
        assert_eq!(percentage(Money::from_cents(50), Money::from_cents(-10)), None);
        assert_eq!(bar_fraction(Some(-20.0)), 0.0);
    }
}
