//! Savings goal CLI commands

use clap::Subcommand;

use crate::backend::Backend;
use crate::config::Settings;
use crate::display::budget::format_goal_list;
use crate::display::report::money;
use crate::error::FintrackResult;
use crate::models::GoalStatus;
use crate::reports::GoalProgress;
use crate::services::GoalService;
use crate::storage::Storage;
use crate::validation::{AddFundsForm, GoalForm, ValidationErrors};

use super::today;

/// Savings goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Create {
        /// Goal name
        name: String,
        /// Amount to save (e.g., "5000")
        target: String,
        /// Target date (YYYY-MM-DD)
        #[arg(short = 'd', long)]
        target_date: Option<String>,
        /// What the savings are for
        #[arg(long)]
        description: Option<String>,
    },
    /// Show savings goals with progress
    List {
        /// Include completed and paused goals
        #[arg(short, long)]
        all: bool,
    },
    /// Add money to a goal
    AddFunds {
        /// Goal name or ID
        goal: String,
        /// Amount to add
        amount: String,
    },
    /// Change a goal's status (active, completed, paused)
    Status {
        /// Goal name or ID
        goal: String,
        /// New status
        status: String,
    },
    /// Delete a goal
    Delete {
        /// Goal name or ID
        goal: String,
    },
}

/// Handle a savings goal command
pub async fn handle_goal_command<B: Backend>(
    storage: &Storage<B>,
    settings: &Settings,
    cmd: GoalCommands,
) -> FintrackResult<()> {
    let service = GoalService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        GoalCommands::Create {
            name,
            target,
            target_date,
            description,
        } => {
            let form = GoalForm {
                name,
                target_amount: target,
                description,
                target_date,
            };
            let goal = service.create(&form).await?;
            println!("Created savings goal: {}", goal.name);
            println!("  Target: {}", money(goal.target_amount, symbol));
            if let Some(date) = goal.target_date {
                println!("  Due: {}", date);
            }
            println!("  ID: {}", goal.id);
        }

        GoalCommands::List { all } => {
            let goals = if all {
                service
                    .list_all()
                    .await?
                    .iter()
                    .map(GoalProgress::compute)
                    .collect()
            } else {
                service.list_with_progress().await?
            };
            print!("{}", format_goal_list(&goals, today(), symbol));
        }

        GoalCommands::AddFunds { goal, amount } => {
            let updated = service.add_funds(&goal, &AddFundsForm { amount }).await?;
            let progress = GoalProgress::compute(&updated);
            println!(
                "{}: {} of {} saved",
                updated.name,
                money(progress.current, symbol),
                money(progress.target, symbol)
            );
            if updated.is_reached() && updated.status() == GoalStatus::Active {
                println!(
                    "Target reached! Mark it done with `fintrack goal status \"{}\" completed`.",
                    updated.name
                );
            }
        }

        GoalCommands::Status { goal, status } => {
            let status = GoalStatus::parse(&status).ok_or_else(|| {
                ValidationErrors::single(
                    "status",
                    format!("Invalid status: '{}'. Use active, completed or paused.", status),
                )
            })?;
            let updated = service.set_status(&goal, status).await?;
            println!("{} is now {}", updated.name, updated.status());
        }

        GoalCommands::Delete { goal } => {
            let deleted = service.delete(&goal).await?;
            println!("Deleted savings goal: {}", deleted.name);
        }
    }

    Ok(())
}
