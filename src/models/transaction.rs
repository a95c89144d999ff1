//! Transaction model
//!
//! A transaction is a single signed movement of money on one account.
//! Expenses are negative, income is positive, and a transfer is stored as
//! two rows: a negative outgoing leg and a positive incoming leg that point
//! at each other's account through `to_account_id`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId, TransactionId, UserId};
use super::money::Money;

/// Kind of transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl TransactionType {
    /// Wire name of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
        }
    }

    /// Parse a transaction type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "out" => Some(Self::Expense),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }

    /// Apply this type's sign convention to an unsigned magnitude
    ///
    /// Transfers keep the sign they are given since it depends on the leg.
    pub fn signed(&self, magnitude: Money) -> Money {
        match self {
            Self::Income => magnitude.abs(),
            Self::Expense => -magnitude.abs(),
            Self::Transfer => magnitude,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
            Self::Transfer => write!(f, "Transfer"),
        }
    }
}

/// A transaction row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    /// The account this transaction belongs to
    pub account_id: AccountId,

    /// For transfers, the account on the other side
    #[serde(default)]
    pub to_account_id: Option<AccountId>,

    #[serde(default)]
    pub category_id: Option<CategoryId>,

    /// Signed amount (negative for expenses and outgoing transfers)
    pub amount: Money,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Calendar date of the transaction
    #[serde(deserialize_with = "super::dates::deserialize")]
    pub transaction_date: NaiveDate,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub is_recurring: Option<bool>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Check if this is an income transaction
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    /// Check if this is an expense transaction
    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Check if this is one leg of a transfer
    pub fn is_transfer(&self) -> bool {
        self.transaction_type == TransactionType::Transfer
    }

    /// Whether `other` is the opposite leg of the same transfer
    pub fn pairs_with(&self, other: &Transaction) -> bool {
        self.is_transfer()
            && other.is_transfer()
            && other.id != self.id
            && Some(other.account_id) == self.to_account_id
            && other.to_account_id == Some(self.account_id)
            && other.transaction_date == self.transaction_date
            && other.amount == -self.amount
    }

    /// Description text, empty when unset
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Validate sign and transfer invariants
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        check_invariants(
            self.transaction_type,
            self.amount,
            self.account_id,
            self.to_account_id,
        )
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.transaction_date.format("%Y-%m-%d"),
            self.description(),
            self.amount
        )
    }
}

/// Insert payload for a new transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    pub user_id: UserId,
    pub account_id: AccountId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<AccountId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    pub amount: Money,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub transaction_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewTransaction {
    /// Validate sign and transfer invariants before insert
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        check_invariants(
            self.transaction_type,
            self.amount,
            self.account_id,
            self.to_account_id,
        )
    }
}

fn check_invariants(
    transaction_type: TransactionType,
    amount: Money,
    account_id: AccountId,
    to_account_id: Option<AccountId>,
) -> Result<(), TransactionValidationError> {
    if amount.is_zero() {
        return Err(TransactionValidationError::ZeroAmount);
    }

    match transaction_type {
        TransactionType::Income if amount.is_negative() => {
            Err(TransactionValidationError::SignMismatch {
                transaction_type,
                amount,
            })
        }
        TransactionType::Expense if amount.is_positive() => {
            Err(TransactionValidationError::SignMismatch {
                transaction_type,
                amount,
            })
        }
        TransactionType::Transfer => match to_account_id {
            None => Err(TransactionValidationError::MissingCounterparty),
            Some(other) if other == account_id => Err(TransactionValidationError::SameAccount),
            Some(_) => Ok(()),
        },
        _ => Ok(()),
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    ZeroAmount,
    SignMismatch {
        transaction_type: TransactionType,
        amount: Money,
    },
    MissingCounterparty,
    SameAccount,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroAmount => write!(f, "Transaction amount cannot be zero"),
            Self::SignMismatch {
                transaction_type,
                amount,
            } => write!(
                f,
                "{} transaction has the wrong sign: {}",
                transaction_type, amount
            ),
            Self::MissingCounterparty => {
                write!(f, "Transfer transaction must reference the other account")
            }
            Self::SameAccount => write!(f, "Cannot transfer to the same account"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
