//! Cash-flow totals over a set of transactions

use serde::Serialize;

use crate::models::{Money, Transaction, TransactionType};

/// Income, expense and net flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CashFlowSummary {
    pub total_income: Money,
    /// Absolute value of expenses
    pub total_expense: Money,
    pub net_flow: Money,
    pub transaction_count: usize,
}

impl CashFlowSummary {
    /// Summarize transactions; transfer legs are counted but move no totals
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut summary = Self::default();
        for txn in transactions {
            match txn.transaction_type {
                TransactionType::Income => summary.total_income += txn.amount.abs(),
                TransactionType::Expense => summary.total_expense += txn.amount.abs(),
                TransactionType::Transfer => {}
            }
            summary.transaction_count += 1;
        }
        summary.net_flow = summary.total_income - summary.total_expense;
        summary
    }
}
