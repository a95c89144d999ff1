//! Budget and savings goal display formatting

use chrono::NaiveDate;

use crate::reports::{BudgetProgress, GoalProgress};

use super::report::{format_optional_percentage, money, progress_bar, truncate, BAR_WIDTH};

/// Format budget progress rows with a bar per budget
pub fn format_budget_list(budgets: &[BudgetProgress], symbol: &str) -> String {
    if budgets.is_empty() {
        return "No active budgets.\n".to_string();
    }

    let mut output = String::new();
    for budget in budgets {
        output.push_str(&format!(
            "{:<20} {} {:>5}  {} of {}\n",
            truncate(&budget.name, 20),
            progress_bar(budget.bar_fraction(), BAR_WIDTH),
            format_optional_percentage(budget.percentage),
            money(budget.spent, symbol),
            money(budget.amount, symbol),
        ));

        let status = if budget.over_budget {
            format!("over by {}", money(-budget.remaining, symbol))
        } else {
            format!("{} left", money(budget.remaining, symbol))
        };
        output.push_str(&format!(
            "{:<20} {} to {}, {}\n",
            "", budget.period_start, budget.period_end, status
        ));
    }
    output
}

/// Format savings goal progress rows
pub fn format_goal_list(goals: &[GoalProgress], today: NaiveDate, symbol: &str) -> String {
    if goals.is_empty() {
        return "No savings goals.\n".to_string();
    }

    let mut output = String::new();
    for goal in goals {
        output.push_str(&format!(
            "{:<20} {} {:>5}  {} of {}\n",
            truncate(&goal.name, 20),
            progress_bar(goal.bar_fraction(), BAR_WIDTH),
            format_optional_percentage(goal.percentage),
            money(goal.current, symbol),
            money(goal.target, symbol),
        ));

        let due = match goal.days_left(today) {
            Some(days) if days < 0 => format!("{} days overdue", -days),
            Some(0) => "due today".to_string(),
            Some(days) => format!("{} days left", days),
            None => "no target date".to_string(),
        };
        output.push_str(&format!("{:<20} {}, {}\n", "", goal.status, due));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::reports::test_support::{budget, goal};

    #[test]
    fn test_over_budget_row() {
        let b = budget(20000, "2025-01-01", "2025-01-31");
        let progress = BudgetProgress::from_spent(&b, Money::from_cents(25000));
        let text = format_budget_list(&[progress], "$");
        assert!(text.contains("125%"));
        assert!(text.contains("over by $50.00"));
        assert!(text.contains("$250.00 of $200.00"));
    }

    #[test]
    fn test_goal_rows() {
        let mut g = goal(100000, Some(25000));
        g.target_date = NaiveDate::from_ymd_opt(2025, 1, 31);
        let today = NaiveDate::from_ymd_opt(2025, 1, 21).unwrap();
        let text = format_goal_list(&[GoalProgress::compute(&g)], today, "$");
        assert!(text.contains("25%"));
        assert!(text.contains("Active, 10 days left"));
    }

    #[test]
    fn test_zero_target_shows_na() {
        let text = format_goal_list(&[GoalProgress::compute(&goal(0, None))], NaiveDate::MIN, "$");
        assert!(text.contains("n/a"));
        assert!(text.contains("no target date"));
    }
}
