//! Transaction display formatting
//!
//! Formats transactions as a register: one row per transaction with date,
//! type marker, description, category and signed amount.

use std::collections::HashMap;

use crate::models::{Category, CategoryId, Transaction, TransactionType};

use super::report::{money, truncate};

fn type_marker(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
        TransactionType::Transfer => "⇄",
    }
}

/// Format a single transaction as a register row
pub fn format_transaction_row(txn: &Transaction, category: Option<&str>, symbol: &str) -> String {
    let description = if txn.description().is_empty() {
        "(no description)"
    } else {
        txn.description()
    };

    format!(
        "{} {} {:<32} {:<16} {:>12}",
        type_marker(txn.transaction_type),
        txn.transaction_date.format("%Y-%m-%d"),
        truncate(description, 32),
        truncate(category.unwrap_or(""), 16),
        money(txn.amount, symbol),
    )
}

/// Format a list of transactions as a register
///
/// Category names are looked up in `categories`; unknown ids show blank.
pub fn format_transaction_list(transactions: &[Transaction], categories: &[Category], symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let names: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut output = String::new();
    output.push_str(&format!(
        "{:1} {:10} {:<32} {:<16} {:>12}\n",
        "", "Date", "Description", "Category", "Amount"
    ));
    output.push_str(&"-".repeat(75));
    output.push('\n');

    for txn in transactions {
        let category = txn.category_id.and_then(|id| names.get(&id).copied());
        output.push_str(&format_transaction_row(txn, category, symbol));
        output.push('\n');
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, category_name: Option<&str>, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.transaction_date.format("%Y-%m-%d")));
    output.push_str(&format!("Type:        {}\n", txn.transaction_type));
    output.push_str(&format!("Amount:      {}\n", money(txn.amount, symbol)));
    if !txn.description().is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description()));
    }
    match (category_name, txn.is_transfer()) {
        (Some(name), _) => output.push_str(&format!("Category:    {}\n", name)),
        (None, true) => {}
        (None, false) => output.push_str("Category:    (uncategorized)\n"),
    }
    if let Some(notes) = txn.notes.as_deref().filter(|n| !n.is_empty()) {
        output.push_str(&format!("Notes:       {}\n", notes));
    }

    output
}
