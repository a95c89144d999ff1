//! Core data models for fintrack
//!
//! One typed record per backend row shape, plus separate `New*` payloads
//! for inserts.

pub mod account;
pub mod budget;
pub mod category;
pub mod dates;
pub mod goal;
pub mod ids;
pub mod money;
pub mod profile;
pub mod transaction;

pub use account::{Account, AccountType, NewAccount};
pub use budget::{Budget, NewBudget};
pub use category::{Category, CategoryType, NewCategory};
pub use goal::{GoalStatus, NewGoal, SavingsGoal};
pub use ids::{AccountId, BudgetId, CategoryId, GoalId, ProfileId, TransactionId, UserId};
pub use money::Money;
pub use profile::{Profile, ProfileUpdate};
pub use transaction::{NewTransaction, Transaction, TransactionType};
