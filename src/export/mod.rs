//! Report export for fintrack
//!
//! Renders a computed report in one of four formats:
//! - Table: the same text the terminal shows
//! - CSV: one row per data point (spreadsheet-compatible)
//! - JSON and YAML: the report wrapped in a versioned envelope

pub mod csv;
pub mod json;
pub mod yaml;

use std::fmt;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::display;
use crate::error::{FintrackError, FintrackResult};
use crate::models::{Category, Transaction};
use crate::reports::{CashFlowSummary, CategoryTotal, DateRange, MonthlyTotals};

pub use json::export_json;
pub use yaml::export_yaml;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Table,
    Csv,
    Json,
    Yaml,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// The data of one report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ReportData {
    Summary(CashFlowSummary),
    Monthly(Vec<MonthlyTotals>),
    Categories(Vec<CategoryTotal>),
    Transactions(Vec<Transaction>),
}

impl ReportData {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Summary(_) => "summary",
            Self::Monthly(_) => "monthly",
            Self::Categories(_) => "categories",
            Self::Transactions(_) => "transactions",
        }
    }
}

/// A report together with the range it covers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub range: DateRange,
    #[serde(flatten)]
    pub data: ReportData,
}

/// Versioned wrapper written by the JSON and YAML exporters
#[derive(Debug, Clone, Serialize)]
pub struct ReportExport<'a> {
    pub schema_version: &'static str,
    pub exported_at: DateTime<Utc>,
    pub app_version: &'static str,
    #[serde(flatten)]
    pub report: &'a Report,
}

impl<'a> ReportExport<'a> {
    pub fn new(report: &'a Report) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION"),
            report,
        }
    }
}

/// Write `report` to `writer` in `format`
///
/// `categories` is only used to name categories in the table rendering of
/// a transaction list.
pub fn export_report<W: Write>(
    report: &Report,
    format: ExportFormat,
    categories: &[Category],
    symbol: &str,
    writer: &mut W,
) -> FintrackResult<()> {
    match format {
        ExportFormat::Table => {
            let text = format_table(report, categories, symbol);
            writer
                .write_all(text.as_bytes())
                .map_err(|e| FintrackError::Export(e.to_string()))
        }
        ExportFormat::Csv => csv::export_csv(report, writer),
        ExportFormat::Json => export_json(report, writer),
        ExportFormat::Yaml => export_yaml(report, writer),
    }
}

fn format_table(report: &Report, categories: &[Category], symbol: &str) -> String {
    match &report.data {
        ReportData::Summary(summary) => {
            display::format_cash_flow_summary(summary, &report.range, symbol)
        }
        ReportData::Monthly(series) => display::format_monthly_series(series, symbol),
        ReportData::Categories(totals) => display::format_category_breakdown(totals, symbol),
        ReportData::Transactions(transactions) => {
            display::format_transaction_list(transactions, categories, symbol)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_table_matches_display() {
        let mut out = Vec::new();
        export_report(&monthly(), ExportFormat::Table, &[], "$", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Jan 25"));
        assert!(text.contains("$60.00"));
    }

    #[test]
    fn test_kind() {
        assert_eq!(monthly().data.kind(), "monthly");
        assert_eq!(ExportFormat::Yaml.to_string(), "yaml");
    }
}
