//! Budget model
//!
//! A budget caps spending in one category over an inclusive date period.
//! The stored `spent` column is informational only; progress is always
//! recomputed from transactions (see `reports::progress`).

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, CategoryId, UserId};
use super::money::Money;

/// A budget row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    pub name: String,

    /// Category whose expenses count against this budget
    pub category_id: CategoryId,

    /// Spending limit for the period
    pub amount: Money,

    /// First day of the period (inclusive)
    #[serde(deserialize_with = "super::dates::deserialize")]
    pub period_start: NaiveDate,

    /// Last day of the period (inclusive)
    #[serde(deserialize_with = "super::dates::deserialize")]
    pub period_end: NaiveDate,

    /// Stored spent total, not authoritative
    #[serde(default)]
    pub spent: Option<Money>,

    #[serde(default)]
    pub is_active: Option<bool>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Budget {
    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }

    /// Check whether a date falls inside the budget period
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.period_start && date <= self.period_end
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        validate_fields(&self.name, self.amount, self.period_start, self.period_end)
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} from {} to {})",
            self.name, self.amount, self.period_start, self.period_end
        )
    }
}

/// Insert payload for a new budget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBudget {
    pub user_id: UserId,
    pub name: String,
    pub category_id: CategoryId,
    pub amount: Money,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

impl NewBudget {
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        validate_fields(&self.name, self.amount, self.period_start, self.period_end)
    }
}

/// Default budget period: today through the last day of this month
pub fn default_period(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today, last_day_of_month(today))
}

/// Last calendar day of the month containing `date`
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(date)
}

fn validate_fields(
    name: &str,
    amount: Money,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), BudgetValidationError> {
    if name.trim().is_empty() {
        return Err(BudgetValidationError::EmptyName);
    }
    if !amount.is_positive() {
        return Err(BudgetValidationError::NonPositiveAmount(amount));
    }
    if end < start {
        return Err(BudgetValidationError::InvertedPeriod { start, end });
    }
    Ok(())
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    EmptyName,
    NonPositiveAmount(Money),
    InvertedPeriod { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Budget name cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Budget amount must be positive, got {}", amount)
            }
            Self::InvertedPeriod { start, end } => {
                write!(f, "Budget period ends ({}) before it starts ({})", end, start)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}
