//! Backend access layer
//!
//! fintrack never stores data itself: every read and write is a request
//! against a hosted PostgREST-style service. This module defines the small
//! query vocabulary the rest of the crate needs and the [`Backend`] trait
//! with two implementations: [`rest::RestBackend`] for the real service and
//! [`memory::MemoryBackend`] for tests and the `--demo` mode.

pub mod demo;
pub mod memory;
pub mod rest;
pub mod session;

use std::fmt;
use std::future::Future;

use serde_json::Value;

pub use memory::MemoryBackend;
pub use rest::RestBackend;
pub use session::{Session, SessionProvider, StaticSession};

/// A table exposed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Accounts,
    Transactions,
    Budgets,
    Categories,
    SavingsGoals,
    Profiles,
}

impl Collection {
    /// Table name on the wire
    pub fn table(&self) -> &'static str {
        match self {
            Self::Accounts => "accounts",
            Self::Transactions => "transactions",
            Self::Budgets => "budgets",
            Self::Categories => "categories",
            Self::SavingsGoals => "savings_goals",
            Self::Profiles => "profiles",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// Comparison applied by a [`Filter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
}

impl FilterOp {
    /// PostgREST operator prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Gte => "gte",
            Self::Lte => "lte",
        }
    }
}

/// A single column predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn new(column: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Eq, value)
    }

    /// Value rendered the way PostgREST expects it in a query string
    pub fn value_text(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Query-string pair, e.g. `("type", "eq.expense")`
    pub fn to_query_pair(&self) -> (String, String) {
        (
            self.column.clone(),
            format!("{}.{}", self.op.as_str(), self.value_text()),
        )
    }
}

/// Sort order for a select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn to_query_value(&self) -> String {
        format!(
            "{}.{}",
            self.column,
            if self.ascending { "asc" } else { "desc" }
        )
    }
}

/// A read request against one collection
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: Collection,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn from(collection: Collection) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::new(column, FilterOp::Eq, value));
        self
    }

    pub fn gte(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::new(column, FilterOp::Gte, value));
        self
    }

    pub fn lte(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::new(column, FilterOp::Lte, value));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Error reported by a backend request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    /// Message as reported by the service
    pub message: String,
    /// HTTP status, when the failure came from a response
    pub status: Option<u16>,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {})", self.message, status),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for BackendError {}

pub type BackendResult<T> = Result<T, BackendError>;

/// Row-level access to a hosted data service
///
/// Rows cross this boundary as JSON objects; typing happens in
/// [`crate::storage::Storage`]. Every write returns the affected rows.
pub trait Backend: Send + Sync {
    /// Fetch rows matching a query
    fn select(&self, query: &Query) -> impl Future<Output = BackendResult<Vec<Value>>> + Send;

    /// Insert rows and return them as stored
    fn insert(
        &self,
        collection: Collection,
        rows: Vec<Value>,
    ) -> impl Future<Output = BackendResult<Vec<Value>>> + Send;

    /// Merge `patch` into every row matching all filters
    fn update(
        &self,
        collection: Collection,
        filters: &[Filter],
        patch: Value,
    ) -> impl Future<Output = BackendResult<Vec<Value>>> + Send;

    /// Delete every row matching all filters and return the deleted rows
    fn delete(
        &self,
        collection: Collection,
        filters: &[Filter],
    ) -> impl Future<Output = BackendResult<Vec<Value>>> + Send;

    /// Insert a row, or merge it into the existing row with the same `on_conflict` value
    fn upsert(
        &self,
        collection: Collection,
        row: Value,
        on_conflict: &str,
    ) -> impl Future<Output = BackendResult<Vec<Value>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = Query::from(Collection::Transactions)
            .eq("type", "expense")
            .gte("transaction_date", "2025-01-01")
            .order_by("transaction_date", false)
            .limit(5);

        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters[1].op, FilterOp::Gte);
        assert_eq!(query.limit, Some(5));
        assert_eq!(
            query.order.map(|o| o.to_query_value()),
            Some("transaction_date.desc".to_string())
        );
    }

    #[test]
    fn test_filter_query_pair() {
        assert_eq!(
            Filter::eq("is_active", true).to_query_pair(),
            ("is_active".to_string(), "eq.true".to_string())
        );
        assert_eq!(
            Filter::new("transaction_date", FilterOp::Lte, "2025-01-31").to_query_pair(),
            ("transaction_date".to_string(), "lte.2025-01-31".to_string())
        );
    }

    #[test]
    fn test_collection_tables() {
        assert_eq!(Collection::SavingsGoals.table(), "savings_goals");
        assert_eq!(Collection::Accounts.to_string(), "accounts");
    }

    #[test]
    fn test_backend_error_display() {
        assert_eq!(BackendError::new("boom").to_string(), "boom");
        let err = BackendError::with_status(401, "JWT expired");
        assert_eq!(err.to_string(), "JWT expired (HTTP 401)");
        assert!(err.is_unauthorized());
    }
}
