//! Category service
//!
//! Categories may be shared defaults or owned by the user, so reads are
//! left to the backend's row policies instead of filtering on `user_id`.

use crate::backend::{Backend, Collection, Query};
use crate::error::{FintrackError, FintrackResult};
use crate::models::{Category, CategoryType, NewCategory};
use crate::storage::{ResourceKey, Storage};
use crate::validation::ValidationErrors;

/// Service for category management
pub struct CategoryService<'a, B: Backend> {
    storage: &'a Storage<B>,
}

impl<'a, B: Backend> CategoryService<'a, B> {
    /// Create a new category service
    pub fn new(storage: &'a Storage<B>) -> Self {
        Self { storage }
    }

    /// Categories of one type, or all of them, ordered by name
    pub async fn list(&self, category_type: Option<CategoryType>) -> FintrackResult<Vec<Category>> {
        self.storage
            .cached(ResourceKey::Categories(category_type), || {
                let query = Query::from(Collection::Categories).order_by("name", true);
                let query = match category_type {
                    Some(ty) => query.eq("type", ty.as_str()),
                    None => query,
                };
                self.storage.select_unscoped(query)
            })
            .await
    }

    /// Create a user-owned category
    pub async fn create(
        &self,
        name: &str,
        category_type: CategoryType,
        color: Option<String>,
    ) -> FintrackResult<Category> {
        let user_id = self.storage.require_user()?;
        let name = name.trim();
        if name.chars().count() < 2 {
            return Err(
                ValidationErrors::single("name", "Name must be at least 2 characters.").into(),
            );
        }

        let existing = self.list(Some(category_type)).await?;
        if existing.iter().any(|c| c.name.eq_ignore_ascii_case(name)) {
            return Err(ValidationErrors::single(
                "name",
                format!(
                    "A category named '{}' already exists for {}.",
                    name,
                    category_type.as_str()
                ),
            )
            .into());
        }

        let new = NewCategory {
            user_id,
            name: name.to_string(),
            category_type,
            color,
            icon: None,
            parent_id: None,
        };
        let category = self.storage.insert_one(Collection::Categories, &new).await?;
        self.storage.invalidate(&ResourceKey::ALL_CATEGORIES);
        Ok(category)
    }

    /// Find a category by name or ID string, optionally restricted to a type
    pub async fn find(
        &self,
        identifier: &str,
        category_type: Option<CategoryType>,
    ) -> FintrackResult<Option<Category>> {
        let categories = self.list(category_type).await?;
        let identifier = identifier.trim();
        Ok(categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(identifier))
            .or_else(|| categories.iter().find(|c| c.id.matches(identifier)))
            .cloned())
    }

    pub async fn resolve(
        &self,
        identifier: &str,
        category_type: Option<CategoryType>,
    ) -> FintrackResult<Category> {
        self.find(identifier, category_type)
            .await?
            .ok_or_else(|| FintrackError::category_not_found(identifier.trim()))
    }
}
