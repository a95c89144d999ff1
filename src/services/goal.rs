//! Savings goal service

use serde_json::json;
use tracing::info;

use crate::backend::{Backend, Collection, Query};
use crate::error::{FintrackError, FintrackResult};
use crate::models::dates::parse_flexible;
use crate::models::{GoalStatus, Money, NewGoal, SavingsGoal};
use crate::reports::GoalProgress;
use crate::storage::{ResourceKey, Storage};
use crate::validation::{AddFundsForm, Form, GoalForm, ValidationErrors};

use super::{non_blank, parse_amount};

/// Service for savings goals
pub struct GoalService<'a, B: Backend> {
    storage: &'a Storage<B>,
}

impl<'a, B: Backend> GoalService<'a, B> {
    /// Create a new goal service
    pub fn new(storage: &'a Storage<B>) -> Self {
        Self { storage }
    }

    /// Create an active goal with nothing saved yet
    pub async fn create(&self, form: &GoalForm) -> FintrackResult<SavingsGoal> {
        form.validate()?;
        let user_id = self.storage.require_user()?;

        let target_date = match non_blank(form.target_date.as_deref()) {
            Some(raw) => Some(
                parse_flexible(&raw)
                    .ok_or_else(|| ValidationErrors::single("target_date", "Invalid date."))?,
            ),
            None => None,
        };
        let new = NewGoal {
            user_id,
            name: form.name.trim().to_string(),
            target_amount: parse_amount("target_amount", &form.target_amount)?,
            current_amount: Money::zero(),
            status: GoalStatus::Active,
            description: non_blank(form.description.as_deref()),
            target_date,
        };

        let goal: SavingsGoal = self.storage.insert_one(Collection::SavingsGoals, &new).await?;
        info!(goal = %goal.name, target = %goal.target_amount, "savings goal created");
        self.storage.invalidate(&[ResourceKey::SavingsGoals]);
        Ok(goal)
    }

    /// Active goals, soonest target date first
    pub async fn list(&self) -> FintrackResult<Vec<SavingsGoal>> {
        self.storage
            .cached(ResourceKey::SavingsGoals, || {
                self.storage.select_as(
                    Query::from(Collection::SavingsGoals)
                        .eq("status", GoalStatus::Active.as_str())
                        .order_by("target_date", true),
                )
            })
            .await
    }

    /// Goals in every status
    pub async fn list_all(&self) -> FintrackResult<Vec<SavingsGoal>> {
        self.storage
            .select_as(Query::from(Collection::SavingsGoals).order_by("target_date", true))
            .await
    }

    pub async fn list_with_progress(&self) -> FintrackResult<Vec<GoalProgress>> {
        Ok(self.list().await?.iter().map(GoalProgress::compute).collect())
    }

    /// Find a goal in any status by name or ID string
    pub async fn find(&self, identifier: &str) -> FintrackResult<Option<SavingsGoal>> {
        let goals = self.list_all().await?;
        let identifier = identifier.trim();
        Ok(goals
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(identifier))
            .or_else(|| goals.iter().find(|g| g.id.matches(identifier)))
            .cloned())
    }

    async fn resolve(&self, identifier: &str) -> FintrackResult<SavingsGoal> {
        self.find(identifier)
            .await?
            .ok_or_else(|| FintrackError::goal_not_found(identifier.trim()))
    }

    /// Add a contribution to a goal's saved amount
    ///
    /// The status is left alone even when the target is reached.
    pub async fn add_funds(&self, identifier: &str, form: &AddFundsForm) -> FintrackResult<SavingsGoal> {
        form.validate()?;
        self.storage.require_user()?;
        let goal = self.resolve(identifier).await?;

        let amount = parse_amount("amount", &form.amount)?;
        let current = goal.current() + amount;
        let updated = self
            .patch(&goal, json!({ "current_amount": current }))
            .await?;
        info!(goal = %updated.name, %amount, saved = %updated.current(), "funds added");
        Ok(updated)
    }

    /// Move a goal to another lifecycle state
    pub async fn set_status(&self, identifier: &str, status: GoalStatus) -> FintrackResult<SavingsGoal> {
        self.storage.require_user()?;
        let goal = self.resolve(identifier).await?;
        self.patch(&goal, json!({ "status": status })).await
    }

    pub async fn delete(&self, identifier: &str) -> FintrackResult<SavingsGoal> {
        self.storage.require_user()?;
        let goal = self.resolve(identifier).await?;
        if !self
            .storage
            .delete_by_id(Collection::SavingsGoals, goal.id.as_uuid())
            .await?
        {
            return Err(FintrackError::goal_not_found(goal.id.to_string()));
        }
        info!(goal = %goal.name, "savings goal deleted");
        self.storage.invalidate(&[ResourceKey::SavingsGoals]);
        Ok(goal)
    }

    async fn patch(&self, goal: &SavingsGoal, patch: serde_json::Value) -> FintrackResult<SavingsGoal> {
        let updated = self
            .storage
            .update_by_id(Collection::SavingsGoals, goal.id.as_uuid(), patch)
            .await?
            .ok_or_else(|| FintrackError::goal_not_found(goal.id.to_string()))?;
        self.storage.invalidate(&[ResourceKey::SavingsGoals]);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::storage;

    fn form(name: &str, target: &str, date: Option<&str>) -> GoalForm {
        GoalForm {
            name: name.into(),
            target_amount: target.into(),
            description: None,
            target_date: date.map(String::from),
        }
    }

    fn funds(amount: &str) -> AddFundsForm {
        AddFundsForm {
            amount: amount.into(),
        }
    }

    #[tokio::test]
    async fn test_create_starts_empty_and_active() {
        let storage = storage();
        let goal = GoalService::new(&storage)
            .create(&form("Emergency fund", "1000", Some("2025-12-31")))
            .await
            .unwrap();
        assert_eq!(goal.current(), Money::zero());
        assert_eq!(goal.status(), GoalStatus::Active);
        assert_eq!(goal.target_amount.cents(), 100000);
        assert!(goal.target_date.is_some());
    }

    #[tokio::test]
    async fn test_list_orders_by_target_date() {
        let storage = storage();
        let service = GoalService::new(&storage);
        service.create(&form("Later", "100", Some("2026-06-01"))).await.unwrap();
        service.create(&form("Sooner", "100", Some("2025-06-01"))).await.unwrap();
        service.create(&form("Someday", "100", None)).await.unwrap();

        let names: Vec<String> = service.list().await.unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Sooner", "Later", "Someday"]);
    }

    #[tokio::test]
    async fn test_add_funds_accumulates() {
        let storage = storage();
        let service = GoalService::new(&storage);
        service.create(&form("Bike", "1000", None)).await.unwrap();

        service.add_funds("bike", &funds("250")).await.unwrap();
        let goal = service.add_funds("Bike", &funds("900")).await.unwrap();
        assert_eq!(goal.current().cents(), 115000);
        // Reaching the target does not complete the goal
        assert_eq!(goal.status(), GoalStatus::Active);
        assert!(goal.is_reached());

        let progress = service.list_with_progress().await.unwrap();
        assert_eq!(progress[0].percentage, Some(115.0));
    }

    #[tokio::test]
    async fn test_add_funds_rejects_non_positive() {
        let storage = storage();
        let service = GoalService::new(&storage);
        service.create(&form("Bike", "1000", None)).await.unwrap();

        let err = service.add_funds("Bike", &funds("0")).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_set_status_removes_from_active_list() {
        let storage = storage();
        let service = GoalService::new(&storage);
        service.create(&form("Bike", "1000", None)).await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 1);

        let paused = service.set_status("Bike", GoalStatus::Paused).await.unwrap();
        assert_eq!(paused.status(), GoalStatus::Paused);
        assert!(service.list().await.unwrap().is_empty());
        assert_eq!(service.list_all().await.unwrap().len(), 1);

        // Paused goals can still be found and funded
        service.add_funds("Bike", &funds("5")).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete() {
        let storage = storage();
        let service = GoalService::new(&storage);
        service.create(&form("Bike", "1000", None)).await.unwrap();
        service.delete("Bike").await.unwrap();
        assert!(service.list_all().await.unwrap().is_empty());
        assert!(service.delete("Bike").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_filtered_by_server_is_not_found() {
        let storage = storage();
        let service = GoalService::new(&storage);
        service.create(&form("Bike", "1000", None)).await.unwrap();
        storage.backend().protect_rows(Collection::SavingsGoals);

        let err = service.delete("Bike").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(service.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_goal_unchanged() {
        let storage = storage();
        let service = GoalService::new(&storage);
        service.create(&form("Bike", "1000", None)).await.unwrap();
        storage
            .backend()
            .fail_update(Collection::SavingsGoals, "permission denied");

        let err = service.add_funds("Bike", &funds("50")).await.unwrap_err();
        assert!(matches!(err, FintrackError::Backend(ref msg) if msg.contains("permission denied")));

        storage.backend().clear_failures();
        let goal = service.resolve("Bike").await.unwrap();
        assert_eq!(goal.current(), Money::zero());
    }
}
