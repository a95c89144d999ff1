//! Report formatting for terminal output
//!
//! Shared helpers (money, percentages, bars) plus the text layouts for the
//! summary, monthly and category reports and the dashboard overview.

use crate::models::Money;
use crate::reports::{CashFlowSummary, CategoryTotal, DateRange, FinancialOverview, MonthlyTotals};

/// Width of progress and chart bars
pub const BAR_WIDTH: usize = 20;

/// Format an amount with the configured currency symbol
pub fn money(amount: Money, symbol: &str) -> String {
    amount.format_with_symbol(symbol)
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// A percentage that may be undefined (zero target or limit)
pub fn format_optional_percentage(pct: Option<f64>) -> String {
    pct.map_or_else(|| "n/a".to_string(), format_percentage)
}

/// Horizontal bar scaled against `max_value`
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Progress bar for a fill fraction in 0.0..=1.0
pub fn progress_bar(fraction: f64, width: usize) -> String {
    format_bar(fraction.clamp(0.0, 1.0), 1.0, width)
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Income, expense and net flow over a range
pub fn format_cash_flow_summary(summary: &CashFlowSummary, range: &DateRange, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Summary {} to {}\n", range.from, range.to));
    output.push_str(&separator(36));
    output.push('\n');
    output.push_str(&format!(
        "  Income:        {:>16}\n",
        money(summary.total_income, symbol)
    ));
    output.push_str(&format!(
        "  Expenses:      {:>16}\n",
        money(summary.total_expense, symbol)
    ));
    output.push_str(&format!(
        "  Net flow:      {:>16}\n",
        money(summary.net_flow, symbol)
    ));
    output.push_str(&format!("  Transactions:  {:>16}\n", summary.transaction_count));
    output
}

/// Month-by-month income and expense table
pub fn format_monthly_series(series: &[MonthlyTotals], symbol: &str) -> String {
    if series.is_empty() {
        return "No income or expenses in this period.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8}  {:>14}  {:>14}  {:>14}\n",
        "Month", "Income", "Expenses", "Net"
    ));
    output.push_str(&separator(56));
    output.push('\n');
    for month in series {
        output.push_str(&format!(
            "{:<8}  {:>14}  {:>14}  {:>14}\n",
            format!("{} {}", month.label, month.month.format("%y")),
            money(month.income, symbol),
            money(month.expense, symbol),
            money(month.net(), symbol),
        ));
    }
    output
}

/// Expenses per category with a proportional bar
pub fn format_category_breakdown(totals: &[CategoryTotal], symbol: &str) -> String {
    if totals.is_empty() {
        return "No expenses in this period.\n".to_string();
    }

    let name_width = totals
        .iter()
        .map(|t| t.name.chars().count())
        .max()
        .unwrap_or(8)
        .clamp(8, 24);
    let max = totals
        .iter()
        .map(|t| t.total.cents())
        .max()
        .unwrap_or(0) as f64;

    let mut output = String::new();
    for total in totals {
        output.push_str(&format!(
            "{:<name_width$}  {:>12}  {:>5}  {}\n",
            truncate(&total.name, name_width),
            money(total.total, symbol),
            format_percentage(total.percentage),
            format_bar(total.total.cents() as f64, max, BAR_WIDTH),
            name_width = name_width,
        ));
    }
    output
}

/// Headline numbers block of the dashboard
pub fn format_overview(overview: &FinancialOverview, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "  Total balance:     {:>14}  ({} accounts)\n",
        money(overview.total_balance, symbol),
        overview.active_accounts
    ));
    output.push_str(&format!(
        "  Monthly income:    {:>14}\n",
        money(overview.monthly_income, symbol)
    ));
    output.push_str(&format!(
        "  Monthly expenses:  {:>14}\n",
        money(overview.monthly_expenses, symbol)
    ));
    output.push_str(&format!(
        "  Net worth:         {:>14}\n",
        money(overview.net_worth, symbol)
    ));
    output
}
