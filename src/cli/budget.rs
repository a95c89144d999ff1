//! Budget CLI commands
//!
//! Budgets cap spending in one expense category over a period.

use clap::Subcommand;

use crate::backend::Backend;
use crate::config::Settings;
use crate::display::budget::format_budget_list;
use crate::display::report::money;
use crate::error::FintrackResult;
use crate::services::BudgetService;
use crate::storage::Storage;
use crate::validation::BudgetForm;

use super::today;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a budget
    Create {
        /// Budget name
        name: String,
        /// Spending limit (e.g., "400.00")
        amount: String,
        /// Expense category name or ID
        #[arg(short, long)]
        category: String,
        /// First day (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<String>,
        /// Last day (YYYY-MM-DD, defaults to the end of this month)
        #[arg(long)]
        end: Option<String>,
    },
    /// Show active budgets with spending progress
    List,
    /// Delete a budget
    Delete {
        /// Budget name or ID
        budget: String,
    },
}

/// Handle a budget command
pub async fn handle_budget_command<B: Backend>(
    storage: &Storage<B>,
    settings: &Settings,
    cmd: BudgetCommands,
) -> FintrackResult<()> {
    let service = BudgetService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Create {
            name,
            amount,
            category,
            start,
            end,
        } => {
            let mut form = BudgetForm::with_default_period(today());
            form.name = name;
            form.amount = amount;
            form.category = category;
            if let Some(start) = start {
                form.period_start = start;
            }
            if let Some(end) = end {
                form.period_end = end;
            }

            let budget = service.create(&form).await?;
            println!("Created budget: {}", budget.name);
            println!("  Limit: {}", money(budget.amount, symbol));
            println!("  Period: {} to {}", budget.period_start, budget.period_end);
            println!("  ID: {}", budget.id);
        }

        BudgetCommands::List => {
            let budgets = service.list_with_progress().await?;
            print!("{}", format_budget_list(&budgets, symbol));
        }

        BudgetCommands::Delete { budget } => {
            let deleted = service.delete(&budget).await?;
            println!("Deleted budget: {}", deleted.name);
        }
    }

    Ok(())
}
