//! Service layer for fintrack
//!
//! Services hold the business logic on top of the storage layer: form
//! validation, name resolution, sign conventions, cache invalidation and
//! cross-entity operations such as transfers and the dashboard.

pub mod account;
pub mod budget;
pub mod category;
pub mod dashboard;
pub mod goal;
pub mod profile;
pub mod transaction;
pub mod transfer;

pub use account::AccountService;
pub use budget::BudgetService;
pub use category::CategoryService;
pub use dashboard::{Dashboard, DashboardService};
pub use goal::GoalService;
pub use profile::ProfileService;
pub use transaction::TransactionService;
pub use transfer::{TransferLeg, TransferResult, TransferService};

use chrono::NaiveDate;

use crate::models::dates::parse_flexible;
use crate::models::Money;
use crate::validation::ValidationErrors;

/// Parse an amount field that already passed form validation
pub(crate) fn parse_amount(field: &'static str, raw: &str) -> Result<Money, ValidationErrors> {
    Money::parse(raw).map_err(|e| ValidationErrors::single(field, e.to_string()))
}

/// Parse an optional date field, falling back to `default` when blank
pub(crate) fn parse_date_or(
    field: &'static str,
    raw: Option<&str>,
    default: NaiveDate,
) -> Result<NaiveDate, ValidationErrors> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => parse_flexible(s)
            .ok_or_else(|| ValidationErrors::single(field, "Invalid date.")),
    }
}

/// Trimmed text, or `None` when blank
pub(crate) fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
