//! Report date ranges
//!
//! Ranges are inclusive on both ends.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::budget::last_day_of_month;
use crate::models::Transaction;

/// Named range relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRangePreset {
    #[default]
    #[serde(rename = "last-30-days")]
    Last30Days,
    ThisMonth,
    ThisYear,
}

impl DateRangePreset {
    pub const ALL: [DateRangePreset; 3] = [Self::Last30Days, Self::ThisMonth, Self::ThisYear];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Last30Days => "last-30-days",
            Self::ThisMonth => "this-month",
            Self::ThisYear => "this-year",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "last-30-days" | "last30days" | "30d" => Some(Self::Last30Days),
            "this-month" | "thismonth" | "month" => Some(Self::ThisMonth),
            "this-year" | "thisyear" | "year" => Some(Self::ThisYear),
            _ => None,
        }
    }

    /// Concrete bounds for this preset as of `today`
    pub fn bounds(&self, today: NaiveDate) -> DateRange {
        let (from, to) = match self {
            Self::Last30Days => (today - Duration::days(30), today),
            Self::ThisMonth => (today.with_day(1).unwrap_or(today), last_day_of_month(today)),
            Self::ThisYear => (
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
                NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today),
            ),
        };
        DateRange { from, to }
    }
}

impl fmt::Display for DateRangePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Last30Days => write!(f, "Last 30 days"),
            Self::ThisMonth => write!(f, "This month"),
            Self::ThisYear => write!(f, "This year"),
        }
    }
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Custom range; `from` must not be after `to`
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, InvertedRange> {
        if from > to {
            return Err(InvertedRange { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    /// Transactions dated within the range, in input order
    pub fn filter(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|t| self.contains(t.transaction_date))
            .cloned()
            .collect()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.from, self.to)
    }
}

/// Error for a custom range whose start is after its end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvertedRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl fmt::Display for InvertedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Range start {} is after its end {}", self.from, self.to)
    }
}

impl std::error::Error for InvertedRange {}
