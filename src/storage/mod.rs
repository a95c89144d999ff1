//! Storage layer for fintrack
//!
//! [`Storage`] is the coordinator the services work through. It owns the
//! backend, the session provider and the read cache, and converts between
//! typed records and backend JSON rows.

pub mod cache;
pub mod file_io;

pub use cache::{QueryCache, ResourceKey};
pub use file_io::{read_json, write_json_atomic};

use std::future::Future;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::{Backend, Collection, Filter, Query, SessionProvider};
use crate::error::{FintrackError, FintrackResult};
use crate::models::UserId;

/// Owner column present on every table
const OWNER_COLUMN: &str = "user_id";

/// Main storage coordinator
pub struct Storage<B: Backend> {
    backend: B,
    session: Box<dyn SessionProvider>,
    cache: QueryCache,
}

impl<B: Backend> Storage<B> {
    pub fn new(backend: B, session: impl SessionProvider + 'static) -> Self {
        Self {
            backend,
            session: Box::new(session),
            cache: QueryCache::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn session(&self) -> &dyn SessionProvider {
        self.session.as_ref()
    }

    /// The signed-in user, if any
    pub fn current_user(&self) -> Option<UserId> {
        self.session.current_user()
    }

    /// The signed-in user, or an auth error for operations that need one
    pub fn require_user(&self) -> FintrackResult<UserId> {
        self.current_user()
            .ok_or_else(FintrackError::not_authenticated)
    }

    /// Restrict a query to the signed-in user's rows
    pub fn scoped(&self, query: Query) -> Query {
        match self.current_user() {
            Some(user) => query.eq(OWNER_COLUMN, user.as_uuid().to_string()),
            None => query,
        }
    }

    fn owner_filters(&self, id: &Uuid) -> Vec<Filter> {
        let mut filters = vec![Filter::eq("id", id.to_string())];
        if let Some(user) = self.current_user() {
            filters.push(Filter::eq(OWNER_COLUMN, user.as_uuid().to_string()));
        }
        filters
    }

    /// Run a query and decode every row
    pub async fn select_as<T: DeserializeOwned>(&self, query: Query) -> FintrackResult<Vec<T>> {
        let query = self.scoped(query);
        debug!(collection = %query.collection, filters = query.filters.len(), "select");
        let rows = self.backend.select(&query).await?;
        decode_rows(rows)
    }

    /// Run a query without the owner filter
    ///
    /// For tables where the backend's own row policies decide visibility,
    /// such as categories shared between users.
    pub async fn select_unscoped<T: DeserializeOwned>(&self, query: Query) -> FintrackResult<Vec<T>> {
        debug!(collection = %query.collection, filters = query.filters.len(), "select");
        let rows = self.backend.select(&query).await?;
        decode_rows(rows)
    }

    /// Serve a read from the cache, loading it on a miss
    pub async fn cached<T, F, Fut>(&self, key: ResourceKey, loader: F) -> FintrackResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = FintrackResult<T>>,
    {
        self.cache.fetch(key, loader).await
    }

    /// Insert one record and decode the stored row
    pub async fn insert_one<T, R>(&self, collection: Collection, record: &T) -> FintrackResult<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let row = serde_json::to_value(record)?;
        let stored = self.backend.insert(collection, vec![row]).await?;
        let row = first_row(collection, stored)?;
        let id = row.get("id").and_then(serde_json::Value::as_str).unwrap_or("?");
        info!(%collection, id, "inserted");
        Ok(serde_json::from_value(row)?)
    }

    /// Insert or merge on `on_conflict`, returning the stored row
    pub async fn upsert_one<T, R>(
        &self,
        collection: Collection,
        record: &T,
        on_conflict: &str,
    ) -> FintrackResult<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let row = serde_json::to_value(record)?;
        let stored = self.backend.upsert(collection, row, on_conflict).await?;
        info!(%collection, "upserted");
        Ok(serde_json::from_value(first_row(collection, stored)?)?)
    }

    /// Patch one row by id; `None` when no such row exists
    pub async fn update_by_id<R: DeserializeOwned>(
        &self,
        collection: Collection,
        id: &Uuid,
        patch: Value,
    ) -> FintrackResult<Option<R>> {
        let filters = self.owner_filters(id);
        let mut rows = self.backend.update(collection, &filters, patch).await?;
        info!(%collection, %id, updated = rows.len(), "updated");
        match rows.pop() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    /// Delete one row by id; returns whether a row was removed
    pub async fn delete_by_id(&self, collection: Collection, id: &Uuid) -> FintrackResult<bool> {
        let filters = self.owner_filters(id);
        let deleted = self.backend.delete(collection, &filters).await?;
        info!(%collection, %id, deleted = deleted.len(), "deleted");
        Ok(!deleted.is_empty())
    }

    pub fn invalidate(&self, keys: &[ResourceKey]) {
        self.cache.invalidate_many(keys);
    }
}

fn first_row(collection: Collection, rows: Vec<Value>) -> FintrackResult<Value> {
    rows.into_iter().next().ok_or_else(|| {
        FintrackError::Backend(format!("{} write returned no rows", collection))
    })
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> FintrackResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(FintrackError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, StaticSession};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, serde::Deserialize)]
    struct Row {
        id: Uuid,
        name: String,
    }

    #[tokio::test]
    async fn test_reads_are_scoped_to_user() {
        let user = UserId::new();
        let storage = Storage::new(MemoryBackend::new(), StaticSession::for_user(user));
        storage
            .backend()
            .insert(
                Collection::Accounts,
                vec![
                    json!({"name": "Mine", "user_id": user.as_uuid().to_string()}),
                    json!({"name": "Theirs", "user_id": UserId::new().as_uuid().to_string()}),
                ],
            )
            .await
            .unwrap();

        let rows: Vec<Row> = storage
            .select_as(Query::from(Collection::Accounts))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Mine");
    }

    #[tokio::test]
    async fn test_require_user() {
        let storage = Storage::new(MemoryBackend::new(), StaticSession::anonymous());
        assert!(storage.require_user().unwrap_err().is_auth());
    }

    #[tokio::test]
    async fn test_insert_update_delete() {
        let user = UserId::new();
        let storage = Storage::new(MemoryBackend::new(), StaticSession::for_user(user));

        let row: Row = storage
            .insert_one(
                Collection::Budgets,
                &json!({"name": "Food", "user_id": user.as_uuid().to_string()}),
            )
            .await
            .unwrap();

        let updated: Option<Row> = storage
            .update_by_id(Collection::Budgets, &row.id, json!({"name": "Groceries"}))
            .await
            .unwrap();
        assert_eq!(updated.map(|r| r.name).as_deref(), Some("Groceries"));

        assert!(storage.delete_by_id(Collection::Budgets, &row.id).await.unwrap());
        assert!(!storage.delete_by_id(Collection::Budgets, &row.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_backend_errors_surface() {
        let storage = Storage::new(MemoryBackend::new(), StaticSession::anonymous());
        storage.backend().fail_select(Collection::Accounts, "permission denied");
        let err = storage
            .select_as::<Row>(Query::from(Collection::Accounts))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Backend error: permission denied");
    }
}
