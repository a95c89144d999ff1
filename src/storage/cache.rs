//! Read cache keyed by resource
//!
//! Each logical read (e.g. "budgets") is cached under a [`ResourceKey`]
//! until a write that affects it invalidates the key. Failed loads are
//! never cached.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

use crate::error::FintrackResult;
use crate::models::CategoryType;

/// Name of one cached read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Accounts,
    AllTransactions,
    RecentTransactions,
    Budgets,
    SavingsGoals,
    FinancialSummary,
    Categories(Option<CategoryType>),
    Profile,
}

impl ResourceKey {
    /// Keys affected by writing a transaction
    pub const TRANSACTION_WRITES: [ResourceKey; 3] = [
        Self::RecentTransactions,
        Self::FinancialSummary,
        Self::AllTransactions,
    ];

    /// Every category key, for invalidating after a category write
    pub const ALL_CATEGORIES: [ResourceKey; 3] = [
        Self::Categories(None),
        Self::Categories(Some(CategoryType::Income)),
        Self::Categories(Some(CategoryType::Expense)),
    ];
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accounts => write!(f, "accounts"),
            Self::AllTransactions => write!(f, "all-transactions"),
            Self::RecentTransactions => write!(f, "recent-transactions"),
            Self::Budgets => write!(f, "budgets"),
            Self::SavingsGoals => write!(f, "savings-goals"),
            Self::FinancialSummary => write!(f, "financial-summary"),
            Self::Categories(None) => write!(f, "categories"),
            Self::Categories(Some(ty)) => write!(f, "categories:{}", ty.as_str()),
            Self::Profile => write!(f, "profile"),
        }
    }
}

type Entry = Arc<dyn Any + Send + Sync>;

/// Cache of decoded read results
#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<ResourceKey, Entry>>,
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self.lock().keys().map(ToString::to_string).collect();
        f.debug_struct("QueryCache").field("keys", &keys).finish()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ResourceKey, Entry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cached value for `key`, if present and of type `T`
    pub fn get<T>(&self, key: ResourceKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.lock()
            .get(&key)
            .and_then(|entry| entry.downcast_ref::<T>())
            .cloned()
    }

    pub fn put<T>(&self, key: ResourceKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.lock().insert(key, Arc::new(value));
    }

    /// Return the cached value or run `loader` and cache its result
    pub async fn fetch<T, F, Fut>(&self, key: ResourceKey, loader: F) -> FintrackResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = FintrackResult<T>>,
    {
        if let Some(hit) = self.get::<T>(key) {
            trace!(%key, "cache hit");
            return Ok(hit);
        }
        trace!(%key, "cache miss");
        let value = loader().await?;
        self.put(key, value.clone());
        Ok(value)
    }

    pub fn contains(&self, key: ResourceKey) -> bool {
        self.lock().contains_key(&key)
    }

    pub fn invalidate(&self, key: ResourceKey) {
        if self.lock().remove(&key).is_some() {
            trace!(%key, "invalidated");
        }
    }

    pub fn invalidate_many(&self, keys: &[ResourceKey]) {
        let mut entries = self.lock();
        for key in keys {
            entries.remove(key);
        }
    }

    pub fn invalidate_all(&self) {
        self.lock().clear();
    }
}
