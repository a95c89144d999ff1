//! In-memory backend
//!
//! Implements the same filter, order and limit semantics as the hosted
//! service over plain JSON rows. Used as the test double for services and
//! as the data source for `--demo`. Failures can be injected per operation
//! to exercise error paths.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use super::{Backend, BackendError, BackendResult, Collection, Filter, FilterOp, Query};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone)]
struct FailureRule {
    operation: Operation,
    collection: Collection,
    when: Option<(String, Value)>,
    message: String,
}

/// Rows held in memory, keyed by collection
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<Collection, Vec<Value>>>,
    failures: Mutex<Vec<FailureRule>>,
    protected: Mutex<Vec<Collection>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make inserts into `collection` fail when any row has `column == value`
    pub fn fail_insert_when(
        &self,
        collection: Collection,
        column: &str,
        value: impl Into<Value>,
        message: &str,
    ) {
        self.push_failure(FailureRule {
            operation: Operation::Insert,
            collection,
            when: Some((column.to_string(), value.into())),
            message: message.to_string(),
        });
    }

    /// Make every select against `collection` fail
    pub fn fail_select(&self, collection: Collection, message: &str) {
        self.push_failure(FailureRule {
            operation: Operation::Select,
            collection,
            when: None,
            message: message.to_string(),
        });
    }

    /// Make every update against `collection` fail
    pub fn fail_update(&self, collection: Collection, message: &str) {
        self.push_failure(FailureRule {
            operation: Operation::Update,
            collection,
            when: None,
            message: message.to_string(),
        });
    }

    /// Make every delete against `collection` fail
    pub fn fail_delete(&self, collection: Collection, message: &str) {
        self.push_failure(FailureRule {
            operation: Operation::Delete,
            collection,
            when: None,
            message: message.to_string(),
        });
    }

    /// Deletes against `collection` succeed but remove nothing, the way
    /// row-level security hides rows the caller may not touch
    pub fn protect_rows(&self, collection: Collection) {
        lock(&self.protected).push(collection);
    }

    /// Remove all injected failures and protections
    pub fn clear_failures(&self) {
        lock(&self.failures).clear();
        lock(&self.protected).clear();
    }

    /// Number of rows currently stored in a collection
    pub fn row_count(&self, collection: Collection) -> usize {
        lock(&self.tables).get(&collection).map_or(0, Vec::len)
    }

    /// Snapshot of all rows in a collection
    pub fn rows(&self, collection: Collection) -> Vec<Value> {
        lock(&self.tables)
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }

    fn push_failure(&self, rule: FailureRule) {
        lock(&self.failures).push(rule);
    }

    fn check_failure(
        &self,
        operation: Operation,
        collection: Collection,
        rows: &[Value],
    ) -> BackendResult<()> {
        let failures = lock(&self.failures);
        let hit = failures.iter().find(|rule| {
            rule.operation == operation
                && rule.collection == collection
                && match &rule.when {
                    None => true,
                    Some((column, value)) => rows.iter().any(|row| {
                        row.get(column)
                            .is_some_and(|v| compare(v, value) == Some(Ordering::Equal))
                    }),
                }
        });
        match hit {
            Some(rule) => Err(BackendError::new(rule.message.clone())),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Compare two JSON scalars the way the database would compare the columns
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.as_str().cmp(y.as_str())),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Number(x), Value::String(y)) => x.as_f64()?.partial_cmp(&y.parse::<f64>().ok()?),
        (Value::String(x), Value::Number(y)) => x.parse::<f64>().ok()?.partial_cmp(&y.as_f64()?),
        _ => None,
    }
}

fn matches_filter(row: &Value, filter: &Filter) -> bool {
    let Some(actual) = row.get(&filter.column) else {
        return false;
    };
    // SQL semantics: NULL never satisfies a comparison
    if actual.is_null() {
        return false;
    }
    match (filter.op, compare(actual, &filter.value)) {
        (FilterOp::Eq, Some(Ordering::Equal)) => true,
        (FilterOp::Gte, Some(Ordering::Equal | Ordering::Greater)) => true,
        (FilterOp::Lte, Some(Ordering::Equal | Ordering::Less)) => true,
        _ => false,
    }
}

fn matches_all(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|f| matches_filter(row, f))
}

/// Column defaults applied on insert, mirroring the hosted schema
fn column_defaults(collection: Collection) -> Vec<(&'static str, Value)> {
    match collection {
        Collection::Accounts => vec![
            ("balance", Value::from(0)),
            ("currency", Value::from("USD")),
            ("is_active", Value::from(true)),
        ],
        Collection::Budgets => vec![("spent", Value::from(0)), ("is_active", Value::from(true))],
        Collection::SavingsGoals => vec![
            ("current_amount", Value::from(0)),
            ("status", Value::from("active")),
        ],
        Collection::Transactions => vec![("is_recurring", Value::from(false))],
        Collection::Categories => vec![("is_default", Value::from(false))],
        Collection::Profiles => vec![],
    }
}

fn prepare_row(collection: Collection, row: Value) -> BackendResult<Value> {
    let Value::Object(mut fields) = row else {
        return Err(BackendError::new(format!(
            "Rows inserted into {} must be JSON objects",
            collection
        )));
    };
    let now = Value::from(Utc::now().to_rfc3339());
    fields
        .entry("id")
        .or_insert_with(|| Value::from(Uuid::new_v4().to_string()));
    fields.entry("created_at").or_insert_with(|| now.clone());
    fields.insert("updated_at".into(), now);
    for (column, default) in column_defaults(collection) {
        let slot = fields.entry(column).or_insert(Value::Null);
        if slot.is_null() {
            *slot = default;
        }
    }
    Ok(Value::Object(fields))
}

fn merge(target: &mut Value, patch: &Map<String, Value>) {
    if let Value::Object(fields) = target {
        for (key, value) in patch {
            fields.insert(key.clone(), value.clone());
        }
        fields.insert("updated_at".into(), Value::from(Utc::now().to_rfc3339()));
    }
}

impl Backend for MemoryBackend {
    async fn select(&self, query: &Query) -> BackendResult<Vec<Value>> {
        self.check_failure(Operation::Select, query.collection, &[])?;
        let tables = lock(&self.tables);
        let mut rows: Vec<Value> = tables
            .get(&query.collection)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(row, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(tables);

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let left = a.get(&order.column).filter(|v| !v.is_null());
                let right = b.get(&order.column).filter(|v| !v.is_null());
                let ordering = match (left, right) {
                    (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
                    (Some(_), None) => return Ordering::Less,
                    (None, Some(_)) => return Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        debug!(collection = %query.collection, rows = rows.len(), "memory select");
        Ok(rows)
    }

    async fn insert(&self, collection: Collection, rows: Vec<Value>) -> BackendResult<Vec<Value>> {
        self.check_failure(Operation::Insert, collection, &rows)?;
        let prepared = rows
            .into_iter()
            .map(|row| prepare_row(collection, row))
            .collect::<BackendResult<Vec<_>>>()?;

        lock(&self.tables)
            .entry(collection)
            .or_default()
            .extend(prepared.iter().cloned());
        debug!(collection = %collection, rows = prepared.len(), "memory insert");
        Ok(prepared)
    }

    async fn update(
        &self,
        collection: Collection,
        filters: &[Filter],
        patch: Value,
    ) -> BackendResult<Vec<Value>> {
        self.check_failure(Operation::Update, collection, &[])?;
        let Value::Object(patch) = patch else {
            return Err(BackendError::new("Update patch must be a JSON object"));
        };

        let mut tables = lock(&self.tables);
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(&collection) {
            for row in rows.iter_mut().filter(|row| matches_all(row, filters)) {
                merge(row, &patch);
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, collection: Collection, filters: &[Filter]) -> BackendResult<Vec<Value>> {
        self.check_failure(Operation::Delete, collection, &[])?;
        if lock(&self.protected).contains(&collection) {
            return Ok(Vec::new());
        }
        let mut tables = lock(&self.tables);
        let Some(rows) = tables.get_mut(&collection) else {
            return Ok(Vec::new());
        };
        let (deleted, kept): (Vec<Value>, Vec<Value>) = rows
            .drain(..)
            .partition(|row| matches_all(row, filters));
        *rows = kept;
        Ok(deleted)
    }

    async fn upsert(
        &self,
        collection: Collection,
        row: Value,
        on_conflict: &str,
    ) -> BackendResult<Vec<Value>> {
        let key = row.get(on_conflict).cloned().unwrap_or(Value::Null);
        {
            let mut tables = lock(&self.tables);
            if let (Some(rows), Value::Object(patch)) = (tables.get_mut(&collection), &row) {
                if let Some(existing) = rows.iter_mut().find(|existing| {
                    !key.is_null()
                        && existing
                            .get(on_conflict)
                            .is_some_and(|v| compare(v, &key) == Some(Ordering::Equal))
                }) {
                    merge(existing, patch);
                    return Ok(vec![existing.clone()]);
                }
            }
        }
        self.insert(collection, vec![row]).await
    }
}
