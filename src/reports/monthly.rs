//! Monthly income/expense series
//!
//! Groups transactions by calendar month of their transaction date. Each
//! month carries summed income and summed absolute expense; transfers count
//! toward neither.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{Money, Transaction, TransactionType};

/// Totals for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    /// First day of the month
    pub month: NaiveDate,
    /// Short month name (e.g. "Jan")
    pub label: String,
    pub income: Money,
    /// Absolute value of expenses
    pub expense: Money,
}

impl MonthlyTotals {
    pub fn net(&self) -> Money {
        self.income - self.expense
    }
}

/// Three-letter English month abbreviation
pub fn month_label(date: NaiveDate) -> &'static str {
    match date.month() {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Aggregate transactions into chronologically ordered monthly totals
///
/// Months with no income or expense activity are omitted. Empty input
/// yields an empty series.
pub fn monthly_series(transactions: &[Transaction]) -> Vec<MonthlyTotals> {
    let mut months: BTreeMap<NaiveDate, (Money, Money)> = BTreeMap::new();

    for txn in transactions {
        let (income, expense) = match txn.transaction_type {
            TransactionType::Income => (txn.amount.abs(), Money::zero()),
            TransactionType::Expense => (Money::zero(), txn.amount.abs()),
            TransactionType::Transfer => continue,
        };
        let entry = months
            .entry(month_start(txn.transaction_date))
            .or_insert((Money::zero(), Money::zero()));
        entry.0 += income;
        entry.1 += expense;
    }

    months
        .into_iter()
        .map(|(month, (income, expense))| MonthlyTotals {
            month,
            label: month_label(month).to_string(),
            income,
            expense,
        })
        .collect()
}
