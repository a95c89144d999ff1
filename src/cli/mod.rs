//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.
//! Handlers are generic over the backend so the same code runs against
//! the hosted service and the in-memory demo data.

pub mod account;
pub mod budget;
pub mod category;
pub mod config;
pub mod dashboard;
pub mod goal;
pub mod profile;
pub mod report;
pub mod session;
pub mod transaction;
pub mod transfer;

use chrono::{Local, NaiveDate};

use crate::error::FintrackResult;
use crate::models::dates::parse_flexible;
use crate::reports::{DateRange, DateRangePreset};
use crate::validation::ValidationErrors;

pub use account::{handle_account_command, AccountCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use config::{handle_config_command, ConfigArgs};
pub use dashboard::handle_dashboard_command;
pub use goal::{handle_goal_command, GoalCommands};
pub use profile::{handle_profile_command, ProfileCommands};
pub use report::{handle_report_command, ReportCommands};
pub use session::{handle_login_command, handle_logout_command, LoginArgs};
pub use transaction::{handle_transaction_command, TransactionCommands};
pub use transfer::{handle_transfer_command, TransferArgs};

/// The local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Turn `--range` / `--from` / `--to` flags into concrete bounds
///
/// Explicit dates win over a preset; a missing end falls back to `today`.
pub fn resolve_range(
    preset: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    default: DateRangePreset,
    today: NaiveDate,
) -> FintrackResult<DateRange> {
    let preset = match preset {
        Some(p) => DateRangePreset::parse(p).ok_or_else(|| {
            ValidationErrors::single(
                "range",
                format!(
                    "Unknown range '{}'. Valid ranges: {}",
                    p,
                    DateRangePreset::ALL.map(|r| r.as_str()).join(", ")
                ),
            )
        })?,
        None => default,
    };

    if from.is_none() && to.is_none() {
        return Ok(preset.bounds(today));
    }

    let bounds = preset.bounds(today);
    let from = match from {
        Some(s) => parse_cli_date(s)?,
        None => bounds.from,
    };
    let to = match to {
        Some(s) => parse_cli_date(s)?,
        None => today,
    };

    DateRange::new(from, to).map_err(|e| ValidationErrors::single("range", e.to_string()).into())
}

fn parse_cli_date(s: &str) -> FintrackResult<NaiveDate> {
    parse_flexible(s).ok_or_else(|| {
        ValidationErrors::single("range", format!("Invalid date '{}'. Use YYYY-MM-DD.", s)).into()
    })
}
