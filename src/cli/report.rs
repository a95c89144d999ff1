//! Report CLI commands

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use tracing::info;

use crate::backend::Backend;
use crate::config::Settings;
use crate::error::{FintrackError, FintrackResult};
use crate::export::{export_report, ExportFormat, Report, ReportData};
use crate::models::{Category, CategoryType};
use crate::reports::{
    category_breakdown, monthly_series, CashFlowSummary, DEFAULT_TOP_CATEGORIES,
};
use crate::services::{CategoryService, TransactionService};
use crate::storage::Storage;

use super::{resolve_range, today};

/// Flags shared by every report
#[derive(Args)]
pub struct ReportOptions {
    /// Range preset (last-30-days, this-month, this-year)
    #[arg(short, long)]
    range: Option<String>,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Table)]
    format: ExportFormat,
    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Income, expense and net flow over a range
    Summary(ReportOptions),
    /// Income and expense per month
    Monthly(ReportOptions),
    /// Largest expense categories
    Categories {
        #[command(flatten)]
        options: ReportOptions,
        /// Number of categories to show
        #[arg(short, long, default_value_t = DEFAULT_TOP_CATEGORIES)]
        top: usize,
    },
}

/// Handle a report command
pub async fn handle_report_command<B: Backend>(
    storage: &Storage<B>,
    settings: &Settings,
    cmd: ReportCommands,
) -> FintrackResult<()> {
    let (options, top) = match &cmd {
        ReportCommands::Summary(options) | ReportCommands::Monthly(options) => {
            (options, DEFAULT_TOP_CATEGORIES)
        }
        ReportCommands::Categories { options, top } => (options, *top),
    };

    let range = resolve_range(
        options.range.as_deref(),
        options.from.as_deref(),
        options.to.as_deref(),
        settings.default_range,
        today(),
    )?;

    let transaction_service = TransactionService::new(storage);
    let category_service = CategoryService::new(storage);
    let (transactions, categories) = tokio::join!(
        transaction_service.in_range(range),
        category_service.list(Some(CategoryType::Expense)),
    );
    let transactions = transactions?;
    let categories = categories?;

    let data = match &cmd {
        ReportCommands::Summary(_) => {
            ReportData::Summary(CashFlowSummary::from_transactions(&transactions))
        }
        ReportCommands::Monthly(_) => ReportData::Monthly(monthly_series(&transactions)),
        ReportCommands::Categories { .. } => {
            ReportData::Categories(category_breakdown(&transactions, &categories, top))
        }
    };

    let report = Report { range, data };
    write_report(
        &report,
        options.format,
        &categories,
        &settings.currency_symbol,
        options.output.as_deref(),
    )
}

/// Export `report` to `output`, or to stdout when no path is given
pub(crate) fn write_report(
    report: &Report,
    format: ExportFormat,
    categories: &[Category],
    symbol: &str,
    output: Option<&Path>,
) -> FintrackResult<()> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                FintrackError::Export(format!("Cannot create {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            export_report(report, format, categories, symbol, &mut writer)?;
            writer.flush()?;
            info!(path = %path.display(), kind = report.data.kind(), %format, "report written");
            println!("Wrote {} report to {}", report.data.kind(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            export_report(report, format, categories, symbol, &mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::monthly;

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monthly.csv");

        write_report(&monthly(), ExportFormat::Csv, &[], "$", Some(&path)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("month,label,income,expense,net\n"));
    }

    #[test]
    fn test_write_report_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");

        let err = write_report(&monthly(), ExportFormat::Json, &[], "$", Some(&path)).unwrap_err();
        assert!(matches!(err, FintrackError::Export(_)));
    }
}
