//! Account display formatting
//!
//! Formats accounts for terminal output in table and detail views.

use crate::models::{Account, Money, Transaction};

use super::report::{money, separator};
use super::transaction::format_transaction_list;

/// Format a list of accounts with balances as a table
pub fn format_account_list(accounts: &[Account], symbol: &str) -> String {
    if accounts.is_empty() {
        return "No accounts found.\n".to_string();
    }

    let name_width = accounts
        .iter()
        .map(|a| a.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);
    let type_width = accounts
        .iter()
        .map(|a| a.account_type.to_string().len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<type_width$}  {:>14}  {:<8}  {}\n",
        "Name",
        "Type",
        "Balance",
        "Currency",
        "Status",
        name_width = name_width,
        type_width = type_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<type_width$}  {:->14}  {:-<8}  {:-<8}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        type_width = type_width,
    ));

    for account in accounts {
        output.push_str(&format!(
            "{:<name_width$}  {:<type_width$}  {:>14}  {:<8}  {}\n",
            account.name,
            account.account_type.to_string(),
            money(account.balance, symbol),
            account.currency(),
            if account.is_active() { "" } else { "Inactive" },
            name_width = name_width,
            type_width = type_width,
        ));
    }

    // Inactive accounts are listed but not totalled
    let total: Money = accounts
        .iter()
        .filter(|a| a.is_active())
        .map(|a| a.balance)
        .sum();
    output.push_str(&format!(
        "{:-<name_width$}  {:-<type_width$}  {:->14}\n",
        "",
        "",
        "",
        name_width = name_width,
        type_width = type_width,
    ));
    output.push_str(&format!(
        "{:<name_width$}  {:<type_width$}  {:>14}\n",
        "TOTAL",
        "",
        money(total, symbol),
        name_width = name_width,
        type_width = type_width,
    ));

    output
}

/// Format a single account's details followed by its transactions
pub fn format_account_details(account: &Account, transactions: &[Transaction], symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  Type:      {}\n", account.account_type));
    output.push_str(&format!("  ID:        {}\n", account.id));
    output.push_str(&format!("  Balance:   {}\n", money(account.balance, symbol)));
    output.push_str(&format!("  Currency:  {}\n", account.currency()));
    output.push_str(&format!(
        "  Active:    {}\n",
        if account.is_active() { "Yes" } else { "No" }
    ));
    if let Some(description) = account.description.as_deref().filter(|d| !d.is_empty()) {
        output.push_str(&format!("  Notes:     {}\n", description));
    }
    if let Some(created) = account.created_at {
        output.push_str(&format!("  Created:   {}\n", created.format("%Y-%m-%d")));
    }

    output.push('\n');
    output.push_str(&separator(40));
    output.push('\n');
    output.push_str(&format_transaction_list(transactions, &[], symbol));
    output
}
