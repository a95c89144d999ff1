//! Dashboard and profile display
//!
//! Each dashboard section renders independently; a section that failed to
//! load prints its error in place of its content.

use std::fmt::Display;

use crate::error::FintrackResult;
use crate::models::Profile;
use crate::services::Dashboard;

use super::budget::{format_budget_list, format_goal_list};
use super::report::{format_category_breakdown, format_monthly_series, format_overview, separator};
use super::transaction::format_transaction_list;

fn section<T>(
    output: &mut String,
    title: &str,
    result: &FintrackResult<T>,
    render: impl FnOnce(&T) -> String,
) {
    output.push_str(title);
    output.push('\n');
    output.push_str(&separator(title.chars().count().max(40)));
    output.push('\n');
    match result {
        Ok(value) => output.push_str(&render(value)),
        Err(err) => output.push_str(&format!("  (unavailable: {})\n", err)),
    }
    output.push('\n');
}

/// Render the full dashboard
pub fn format_dashboard(dashboard: &Dashboard, greeting: Option<&str>, symbol: &str) -> String {
    let mut output = String::new();
    if let Some(name) = greeting {
        output.push_str(&format!("Welcome back, {}\n\n", name));
    }

    section(&mut output, "Overview", &dashboard.overview, |o| {
        format_overview(o, symbol)
    });
    section(&mut output, "Recent transactions", &dashboard.recent, |t| {
        format_transaction_list(t, &[], symbol)
    });
    section(&mut output, "Budgets", &dashboard.budgets, |b| {
        format_budget_list(b, symbol)
    });
    section(&mut output, "Savings goals", &dashboard.goals, |g| {
        format_goal_list(g, dashboard.today, symbol)
    });
    section(
        &mut output,
        "Expenses by category",
        &dashboard.expense_by_category,
        |c| format_category_breakdown(c, symbol),
    );
    section(&mut output, "Monthly income and expenses", &dashboard.monthly, |m| {
        format_monthly_series(m, symbol)
    });
    output
}

fn field(output: &mut String, label: &str, value: Option<impl Display>) {
    match value {
        Some(v) => output.push_str(&format!("  {:<10} {}\n", label, v)),
        None => output.push_str(&format!("  {:<10} -\n", label)),
    }
}

/// Format the profile settings
pub fn format_profile(profile: &Profile) -> String {
    let mut output = format!("Profile: {}\n", profile.display_name());
    field(&mut output, "Name:", profile.full_name.as_deref());
    field(&mut output, "Email:", profile.email.as_deref());
    field(&mut output, "Phone:", profile.phone.as_deref());
    field(&mut output, "Timezone:", profile.timezone.as_deref());
    field(&mut output, "Currency:", profile.currency.as_deref());
    field(
        &mut output,
        "Updated:",
        profile.updated_at.map(|at| at.format("%Y-%m-%d %H:%M")),
    );
    output
}
