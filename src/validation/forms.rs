//! Input forms for every write operation
//!
//! Each form keeps the raw text the user entered. Services validate the
//! form first and only then parse values into typed payloads.

use chrono::NaiveDate;

use super::{FieldRule, Form, FormSchema};
use crate::models::account::DEFAULT_CURRENCY;
use crate::models::budget::default_period;
use crate::models::AccountType;

const ENTRY_TYPES: &[&str] = &["income", "expense"];

fn opt(value: &Option<String>) -> Option<String> {
    value.clone()
}

/// Income or expense entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    pub description: String,
    pub amount: String,
    /// `income` or `expense`
    pub transaction_type: String,
    /// Account name or id
    pub account: String,
    /// Category name or id
    pub category: String,
    /// Defaults to today when unset
    pub date: Option<String>,
    pub notes: Option<String>,
}

impl Form for TransactionForm {
    fn schema() -> FormSchema {
        FormSchema::new()
            .field(FieldRule::new("description", "Description").min_chars(2))
            .field(FieldRule::new("amount", "Amount").positive())
            .field(FieldRule::new("type", "Type").one_of(ENTRY_TYPES))
            .field(FieldRule::new("account", "Account").required("Please select an account."))
            .field(FieldRule::new("category", "Category").required("Please select a category."))
            .field(FieldRule::new("date", "Date").optional().date())
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "description" => Some(self.description.clone()),
            "amount" => Some(self.amount.clone()),
            "type" => Some(self.transaction_type.clone()),
            "account" => Some(self.account.clone()),
            "category" => Some(self.category.clone()),
            "date" => opt(&self.date),
            "notes" => opt(&self.notes),
            _ => None,
        }
    }
}

/// Move money between two accounts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub description: String,
    pub amount: String,
    pub from_account: String,
    pub to_account: String,
    pub date: Option<String>,
}

impl Form for TransferForm {
    fn schema() -> FormSchema {
        FormSchema::new()
            .field(FieldRule::new("description", "Description").min_chars(2))
            .field(FieldRule::new("amount", "Amount").positive())
            .field(
                FieldRule::new("from_account", "Source account")
                    .required("Please select source account."),
            )
            .field(
                FieldRule::new("to_account", "Destination account")
                    .required("Please select destination account.")
                    .different_from(
                        "from_account",
                        "Source and destination accounts must be different",
                    ),
            )
            .field(FieldRule::new("date", "Date").optional().date())
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "description" => Some(self.description.clone()),
            "amount" => Some(self.amount.clone()),
            "from_account" => Some(self.from_account.clone()),
            "to_account" => Some(self.to_account.clone()),
            "date" => opt(&self.date),
            _ => None,
        }
    }
}

/// Spending cap for a category over a period
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetForm {
    pub name: String,
    pub amount: String,
    /// Category name or id
    pub category: String,
    pub period_start: String,
    pub period_end: String,
}

impl BudgetForm {
    /// A blank form whose period runs from today to the end of the month
    pub fn with_default_period(today: NaiveDate) -> Self {
        let (start, end) = default_period(today);
        Self {
            period_start: start.format("%Y-%m-%d").to_string(),
            period_end: end.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }
}

impl Form for BudgetForm {
    fn schema() -> FormSchema {
        FormSchema::new()
            .field(FieldRule::new("name", "Name").min_chars(2))
            .field(FieldRule::new("amount", "Amount").positive())
            .field(FieldRule::new("category", "Category").required("Please select a category."))
            .field(
                FieldRule::new("period_start", "Start date")
                    .required("Please select a start date.")
                    .date(),
            )
            .field(
                FieldRule::new("period_end", "End date")
                    .required("Please select an end date.")
                    .date()
                    .not_before("period_start", "End date must be on or after the start date."),
            )
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "amount" => Some(self.amount.clone()),
            "category" => Some(self.category.clone()),
            "period_start" => Some(self.period_start.clone()),
            "period_end" => Some(self.period_end.clone()),
            _ => None,
        }
    }
}

/// New savings goal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalForm {
    pub name: String,
    pub target_amount: String,
    pub description: Option<String>,
    pub target_date: Option<String>,
}

impl Form for GoalForm {
    fn schema() -> FormSchema {
        FormSchema::new()
            .field(FieldRule::new("name", "Name").min_chars(2))
            .field(FieldRule::new("target_amount", "Target amount").positive())
            .field(FieldRule::new("target_date", "Target date").optional().date())
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "target_amount" => Some(self.target_amount.clone()),
            "description" => opt(&self.description),
            "target_date" => opt(&self.target_date),
            _ => None,
        }
    }
}

/// Contribution to a savings goal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddFundsForm {
    pub amount: String,
}

impl Form for AddFundsForm {
    fn schema() -> FormSchema {
        FormSchema::new().field(FieldRule::new("amount", "Amount").positive())
    }

    fn field(&self, name: &str) -> Option<String> {
        (name == "amount").then(|| self.amount.clone())
    }
}

/// New account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountForm {
    pub name: String,
    pub account_type: String,
    pub balance: String,
    pub currency: String,
    pub description: Option<String>,
}

impl Default for AccountForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            account_type: AccountType::default().as_str().to_string(),
            balance: "0".to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            description: None,
        }
    }
}

impl Form for AccountForm {
    fn schema() -> FormSchema {
        FormSchema::new()
            .field(FieldRule::new("name", "Name").min_chars(2))
            .field(FieldRule::new("type", "Type").one_of(AccountType::NAMES))
            .field(FieldRule::new("balance", "Balance").optional().numeric())
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "type" => Some(self.account_type.clone()),
            "balance" => Some(self.balance.clone()),
            "currency" => Some(self.currency.clone()),
            "description" => opt(&self.description),
            _ => None,
        }
    }
}

/// Profile settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub timezone: String,
    pub currency: String,
}

impl Form for ProfileForm {
    fn schema() -> FormSchema {
        FormSchema::new()
            .field(FieldRule::new("full_name", "Name").min_chars(2))
            .field(FieldRule::new("email", "Email").email())
            .field(FieldRule::new("timezone", "Timezone").required("Please select a timezone."))
            .field(FieldRule::new("currency", "Currency").required("Please select a currency."))
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "full_name" => Some(self.full_name.clone()),
            "email" => Some(self.email.clone()),
            "phone" => opt(&self.phone),
            "timezone" => Some(self.timezone.clone()),
            "currency" => Some(self.currency.clone()),
            _ => None,
        }
    }
}
