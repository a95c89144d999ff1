//! Savings goal model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GoalId, UserId};
use super::money::Money;

/// Lifecycle state of a savings goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Paused,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Paused => "paused",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "completed" | "complete" | "done" => Some(Self::Completed),
            "paused" | "pause" => Some(Self::Paused),
            _ => None,
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Completed => write!(f, "Completed"),
            Self::Paused => write!(f, "Paused"),
        }
    }
}

/// A savings goal row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: GoalId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Amount the user is saving toward
    pub target_amount: Money,

    /// Amount saved so far; a null column means nothing saved yet
    #[serde(default)]
    pub current_amount: Option<Money>,

    #[serde(default, deserialize_with = "super::dates::deserialize_option")]
    pub target_date: Option<NaiveDate>,

    #[serde(default)]
    pub status: Option<GoalStatus>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SavingsGoal {
    /// Saved amount, treating a missing value as zero
    pub fn current(&self) -> Money {
        self.current_amount.unwrap_or_default()
    }

    pub fn status(&self) -> GoalStatus {
        self.status.unwrap_or_default()
    }

    /// Whether the saved amount has reached the target
    pub fn is_reached(&self) -> bool {
        self.target_amount.is_positive() && self.current() >= self.target_amount
    }
}

impl fmt::Display for SavingsGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} of {})", self.name, self.current(), self.target_amount)
    }
}

/// Insert payload for a new savings goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewGoal {
    pub user_id: UserId,
    pub name: String,
    pub target_amount: Money,
    pub current_amount: Money,
    pub status: GoalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(current: serde_json::Value) -> SavingsGoal {
        serde_json::from_value(serde_json::json!({
            "id": "7d444840-9dc0-11d1-b245-5ffdce74fad2",
            "user_id": "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            "name": "Emergency fund",
            "description": null,
            "target_amount": 1000,
            "current_amount": current,
            "target_date": "2025-12-31",
            "status": "active",
            "created_at": "2025-01-01T00:00:00+00:00",
            "updated_at": "2025-01-01T00:00:00+00:00"
        }))
        .unwrap()
    }

    #[test]
    fn test_null_current_amount_is_zero() {
        let goal = sample(serde_json::Value::Null);
        assert_eq!(goal.current(), Money::zero());
        assert!(!goal.is_reached());
    }

    #[test]
    fn test_deserialize() {
        let goal = sample(serde_json::json!(250));
        assert_eq!(goal.current().cents(), 25000);
        assert_eq!(goal.status(), GoalStatus::Active);
        assert_eq!(goal.target_date, NaiveDate::from_ymd_opt(2025, 12, 31));
    }

    #[test]
    fn test_missing_target_date() {
        let mut value = serde_json::to_value(sample(serde_json::json!(0))).unwrap();
        value["target_date"] = serde_json::Value::Null;
        let goal: SavingsGoal = serde_json::from_value(value).unwrap();
        assert_eq!(goal.target_date, None);
    }

    #[test]
    fn test_is_reached() {
        assert!(sample(serde_json::json!(1000)).is_reached());
        assert!(sample(serde_json::json!(1500)).is_reached());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(GoalStatus::parse("done"), Some(GoalStatus::Completed));
        assert_eq!(GoalStatus::parse("Paused"), Some(GoalStatus::Paused));
        assert_eq!(GoalStatus::parse("archived"), None);
    }
}
