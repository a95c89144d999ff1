//! Dashboard financial overview

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::budget::last_day_of_month;
use crate::models::{Account, Money, Transaction};

use super::summary::CashFlowSummary;

/// Headline numbers for the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FinancialOverview {
    /// Sum of balances over active accounts
    pub total_balance: Money,
    pub monthly_income: Money,
    /// Absolute value of this month's expenses
    pub monthly_expenses: Money,
    pub net_worth: Money,
    pub active_accounts: usize,
}

impl FinancialOverview {
    /// Compute the overview as of `today`
    ///
    /// Monthly figures cover the calendar month containing `today`.
    pub fn compute(accounts: &[Account], transactions: &[Transaction], today: NaiveDate) -> Self {
        let active: Vec<&Account> = accounts.iter().filter(|a| a.is_active()).collect();
        let total_balance: Money = active.iter().map(|a| a.balance).sum();

        let month_start = today.with_day(1).unwrap_or(today);
        let month_end = last_day_of_month(today);
        let this_month: Vec<Transaction> = transactions
            .iter()
            .filter(|t| t.transaction_date >= month_start && t.transaction_date <= month_end)
            .cloned()
            .collect();
        let month = CashFlowSummary::from_transactions(&this_month);

        Self {
            total_balance,
            monthly_income: month.total_income,
            monthly_expenses: month.total_expense,
            net_worth: total_balance,
            active_accounts: active.len(),
        }
    }

    pub fn monthly_net(&self) -> Money {
        self.monthly_income - self.monthly_expenses
    }
}
