//! Expense totals per category
//!
//! Used for the dashboard expense chart and the categories report.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::category::UNCATEGORIZED;
use crate::models::{Category, CategoryId, Money, Transaction};

use super::progress::percentage;

/// Number of categories kept by default
pub const DEFAULT_TOP_CATEGORIES: usize = 6;

/// Expense total for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    /// Absolute expense amount
    pub total: Money,
    /// Share of all expenses in the input, 0-100
    pub percentage: f64,
}

/// Sum expenses per category name and keep the `top` largest
///
/// Transactions without a category, or whose category is not in
/// `categories`, are grouped under "Uncategorized". Ties keep the order in
/// which each category first appeared in `transactions`.
pub fn category_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
    top: usize,
) -> Vec<CategoryTotal> {
    let names: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    // Insertion order doubles as the tie-breaker
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, Money> = HashMap::new();
    let mut grand_total = Money::zero();

    for txn in transactions.iter().filter(|t| t.is_expense()) {
        let name = txn
            .category_id
            .and_then(|id| names.get(&id).copied())
            .unwrap_or(UNCATEGORIZED);
        let amount = txn.amount.abs();
        grand_total += amount;
        totals
            .entry(name)
            .and_modify(|t| *t += amount)
            .or_insert_with(|| {
                order.push(name);
                amount
            });
    }

    let mut rows: Vec<(&str, Money)> = order
        .into_iter()
        .map(|name| (name, totals.get(name).copied().unwrap_or_default()))
        .collect();
    // sort_by is stable
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows.truncate(top);

    rows.into_iter()
        .map(|(name, total)| CategoryTotal {
            name: name.to_string(),
            total,
            percentage: percentage(total, grand_total).unwrap_or(0.0),
        })
        .collect()
}
