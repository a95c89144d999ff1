//! Account model
//!
//! Represents money containers (bank accounts, cash, e-wallets, etc.)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, UserId};
use super::money::Money;

/// Currency used when an account row does not specify one
pub const DEFAULT_CURRENCY: &str = "USD";

/// Type of account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Bank account
    #[default]
    Bank,
    /// Cash/wallet
    Cash,
    /// E-wallet (payment apps)
    EWallet,
    /// Credit card
    CreditCard,
    /// Investment account
    Investment,
}

impl AccountType {
    /// All account types, in display order
    pub const ALL: [AccountType; 5] = [
        Self::Bank,
        Self::Cash,
        Self::EWallet,
        Self::CreditCard,
        Self::Investment,
    ];

    /// Wire names accepted by the backend
    pub const NAMES: &'static [&'static str] =
        &["bank", "cash", "e_wallet", "credit_card", "investment"];

    /// Returns true if this account type typically carries debt
    pub fn is_liability(&self) -> bool {
        matches!(self, Self::CreditCard)
    }

    /// Wire name of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Cash => "cash",
            Self::EWallet => "e_wallet",
            Self::CreditCard => "credit_card",
            Self::Investment => "investment",
        }
    }

    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "bank" | "checking" | "savings" => Some(Self::Bank),
            "cash" => Some(Self::Cash),
            "e_wallet" | "ewallet" | "wallet" => Some(Self::EWallet),
            "credit_card" | "creditcard" | "credit" => Some(Self::CreditCard),
            "investment" => Some(Self::Investment),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bank => write!(f, "Bank"),
            Self::Cash => write!(f, "Cash"),
            Self::EWallet => write!(f, "E-Wallet"),
            Self::CreditCard => write!(f, "Credit Card"),
            Self::Investment => write!(f, "Investment"),
        }
    }
}

/// An account row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Owning user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    /// Account name (e.g., "BCA Checking")
    pub name: String,

    /// Type of account
    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Current balance as stored by the backend
    #[serde(default)]
    pub balance: Money,

    /// ISO currency code
    #[serde(default)]
    pub currency: Option<String>,

    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,

    /// Soft-delete flag; a null column counts as active
    #[serde(default)]
    pub is_active: Option<bool>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Whether the account has not been deactivated
    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }

    /// Currency code, falling back to the default
    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(AccountValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}

/// Insert payload for a new account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAccount {
    pub user_id: UserId,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub balance: Money,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max 100)", len)
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "user_id": "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            "name": "BCA Checking",
            "type": "e_wallet",
            "balance": 1250.75,
            "currency": null,
            "description": null,
            "is_active": null,
            "created_at": "2025-01-01T08:00:00.123456+00:00",
            "updated_at": "2025-01-02T08:00:00+00:00"
        })
    }

    #[test]
    fn test_deserialize_backend_row() {
        let account: Account = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(account.name, "BCA Checking");
        assert_eq!(account.account_type, AccountType::EWallet);
        assert_eq!(account.balance.cents(), 125075);
        assert!(account.is_active());
        assert_eq!(account.currency(), "USD");
    }

    #[test]
    fn test_inactive_account() {
        let mut row = sample_json();
        row["is_active"] = serde_json::json!(false);
        let account: Account = serde_json::from_value(row).unwrap();
        assert!(!account.is_active());
    }

    #[test]
    fn test_validation() {
        let mut account: Account = serde_json::from_value(sample_json()).unwrap();
        assert!(account.validate().is_ok());

        account.name = String::new();
        assert_eq!(account.validate(), Err(AccountValidationError::EmptyName));

        account.name = "a".repeat(101);
        assert!(matches!(
            account.validate(),
            Err(AccountValidationError::NameTooLong(_))
        ));
    }

    #[test]
    fn test_account_type_parsing() {
        assert_eq!(AccountType::parse("bank"), Some(AccountType::Bank));
        assert_eq!(AccountType::parse("E-Wallet"), Some(AccountType::EWallet));
        assert_eq!(AccountType::parse("credit-card"), Some(AccountType::CreditCard));
        assert_eq!(AccountType::parse("invalid"), None);
    }

    #[test]
    fn test_names_match_wire_format() {
        for ty in AccountType::ALL {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
            assert!(AccountType::NAMES.contains(&ty.as_str()));
        }
    }

    #[test]
    fn test_is_liability() {
        assert!(AccountType::CreditCard.is_liability());
        assert!(!AccountType::Bank.is_liability());
    }

    #[test]
    fn test_new_account_omits_missing_description() {
        let new = NewAccount {
            user_id: UserId::new(),
            name: "Wallet".into(),
            account_type: AccountType::Cash,
            balance: Money::from_cents(5000),
            currency: DEFAULT_CURRENCY.into(),
            description: None,
        };
        let json = serde_json::to_value(&new).unwrap();
        assert_eq!(json["type"], "cash");
        assert_eq!(json["balance"], 50.0);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_display() {
        let account: Account = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(format!("{}", account), "BCA Checking (E-Wallet)");
    }
}
