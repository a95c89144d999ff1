//! Transaction CLI commands
//!
//! Implements CLI commands for recording and listing income and expense
//! entries.

use std::path::PathBuf;

use clap::Subcommand;

use crate::backend::Backend;
use crate::config::Settings;
use crate::display::report::money;
use crate::display::transaction::format_transaction_list;
use crate::error::FintrackResult;
use crate::export::{ExportFormat, Report, ReportData};
use crate::services::{CategoryService, TransactionService};
use crate::storage::Storage;
use crate::validation::TransactionForm;

use super::report::write_report;
use super::{resolve_range, today};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record an income or expense
    Add {
        /// What the money was for
        description: String,
        /// Amount as a positive number (e.g., "42.50")
        amount: String,
        /// Entry type (income, expense)
        #[arg(short = 't', long = "type", default_value = "expense")]
        transaction_type: String,
        /// Account name or ID
        #[arg(short, long)]
        account: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List transactions in a date range
    List {
        /// Only this account (name or ID)
        #[arg(short, long)]
        account: Option<String>,
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
    },
    /// Show the most recent transactions
    Recent {
        /// Number of transactions to show (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID (full or short prefix)
        id: String,
    },
}

/// Handle a transaction command
pub async fn handle_transaction_command<B: Backend>(
    storage: &Storage<B>,
    settings: &Settings,
    cmd: TransactionCommands,
) -> FintrackResult<()> {
    let service = TransactionService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            description,
            amount,
            transaction_type,
            account,
            category,
            date,
            notes,
        } => {
            let form = TransactionForm {
                description,
                amount,
                transaction_type,
                account,
                category,
                date,
                notes,
            };
            let txn = service.add(&form, today()).await?;

            println!("Recorded {}: {}", txn.transaction_type, txn.description());
            println!("  Amount: {}", money(txn.amount, symbol));
            println!("  Date: {}", txn.transaction_date);
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            account,
            range,
            from,
            to,
            format,
            output,
        } => {
            let range = resolve_range(
                range.as_deref(),
                from.as_deref(),
                to.as_deref(),
                settings.default_range,
                today(),
            )?;

            let transactions = match account {
                Some(account) => range.filter(&service.for_account(&account).await?),
                None => service.in_range(range).await?,
            };
            let categories = CategoryService::new(storage).list(None).await?;

            let report = Report {
                range,
                data: ReportData::Transactions(transactions),
            };
            write_report(&report, format, &categories, symbol, output.as_deref())?;
        }

        TransactionCommands::Recent { limit } => {
            let category_service = CategoryService::new(storage);
            let (transactions, categories) = tokio::join!(
                service.recent(limit.unwrap_or(settings.recent_limit)),
                category_service.list(None),
            );
            print!(
                "{}",
                format_transaction_list(&transactions?, &categories?, symbol)
            );
        }

        TransactionCommands::Delete { id } => {
            for deleted in service.delete(&id).await? {
                println!(
                    "Deleted {} of {} on {}",
                    deleted.transaction_type,
                    money(deleted.amount.abs(), symbol),
                    deleted.transaction_date
                );
            }
        }
    }

    Ok(())
}

