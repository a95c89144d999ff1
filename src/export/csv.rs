//! CSV export
//!
//! One header row, then one row per data point. Amounts are plain decimals
//! without a currency symbol.

use std::io::Write;

use serde::Serialize;

use super::{Report, ReportData};
use crate::error::{FintrackError, FintrackResult};
use crate::models::Transaction;

#[derive(Serialize)]
struct SummaryRow {
    from: String,
    to: String,
    income: String,
    expense: String,
    net: String,
    transactions: usize,
}

#[derive(Serialize)]
struct MonthlyRow<'a> {
    month: String,
    label: &'a str,
    income: String,
    expense: String,
    net: String,
}

#[derive(Serialize)]
struct CategoryRow<'a> {
    category: &'a str,
    total: String,
    percentage: String,
}

#[derive(Serialize)]
struct TransactionRow<'a> {
    id: String,
    date: String,
    #[serde(rename = "type")]
    transaction_type: &'static str,
    description: &'a str,
    amount: String,
    account_id: String,
    category_id: String,
}

impl<'a> From<&'a Transaction> for TransactionRow<'a> {
    fn from(txn: &'a Transaction) -> Self {
        Self {
            id: txn.id.as_uuid().to_string(),
            date: txn.transaction_date.to_string(),
            transaction_type: txn.transaction_type.as_str(),
            description: txn.description(),
            amount: decimal(txn.amount),
            account_id: txn.account_id.as_uuid().to_string(),
            category_id: txn
                .category_id
                .map(|id| id.as_uuid().to_string())
                .unwrap_or_default(),
        }
    }
}

fn decimal(amount: crate::models::Money) -> String {
    amount.format_with_symbol("")
}

/// Write the report as CSV
pub fn export_csv<W: Write>(report: &Report, writer: &mut W) -> FintrackResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    match &report.data {
        ReportData::Summary(summary) => csv.serialize(SummaryRow {
            from: report.range.from.to_string(),
            to: report.range.to.to_string(),
            income: decimal(summary.total_income),
            expense: decimal(summary.total_expense),
            net: decimal(summary.net_flow),
            transactions: summary.transaction_count,
        })?,
        ReportData::Monthly(series) => {
            for month in series {
                csv.serialize(MonthlyRow {
                    month: month.month.format("%Y-%m").to_string(),
                    label: &month.label,
                    income: decimal(month.income),
                    expense: decimal(month.expense),
                    net: decimal(month.net()),
                })?;
            }
        }
        ReportData::Categories(totals) => {
            for total in totals {
                csv.serialize(CategoryRow {
                    category: &total.name,
                    total: decimal(total.total),
                    percentage: format!("{:.2}", total.percentage),
                })?;
            }
        }
        ReportData::Transactions(transactions) => {
            for txn in transactions {
                csv.serialize(TransactionRow::from(txn))?;
            }
        }
    }

    csv.flush().map_err(|e| FintrackError::Export(e.to_string()))
}
