//! Profile service
//!
//! One profile row per user, written with an upsert keyed on `user_id` so
//! the first save creates it.

use tracing::info;

use crate::backend::{Backend, Collection, Query};
use crate::error::FintrackResult;
use crate::models::account::DEFAULT_CURRENCY;
use crate::models::{Profile, ProfileUpdate};
use crate::storage::{ResourceKey, Storage};
use crate::validation::{Form, ProfileForm};

use super::non_blank;

const DEFAULT_TIMEZONE: &str = "UTC";

/// Service for the signed-in user's profile
pub struct ProfileService<'a, B: Backend> {
    storage: &'a Storage<B>,
}

impl<'a, B: Backend> ProfileService<'a, B> {
    pub fn new(storage: &'a Storage<B>) -> Self {
        Self { storage }
    }

    /// The user's profile, `None` until one has been saved
    pub async fn get(&self) -> FintrackResult<Option<Profile>> {
        let user_id = self.storage.require_user()?;
        self.storage
            .cached(ResourceKey::Profile, || async move {
                let mut rows: Vec<Profile> = self
                    .storage
                    .select_as(
                        Query::from(Collection::Profiles)
                            .eq("user_id", user_id.as_uuid().to_string())
                            .limit(1),
                    )
                    .await?;
                Ok(rows.pop())
            })
            .await
    }

    /// A form pre-filled from the stored profile, or from the session when
    /// there is none yet
    pub async fn current_form(&self) -> FintrackResult<ProfileForm> {
        let profile = self.get().await?;
        let session_email = self.storage.session().email();
        Ok(match profile {
            Some(p) => ProfileForm {
                full_name: p.full_name.unwrap_or_default(),
                email: p.email.or(session_email).unwrap_or_default(),
                phone: p.phone,
                timezone: p.timezone.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
                currency: p.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            },
            None => ProfileForm {
                email: session_email.unwrap_or_default(),
                timezone: DEFAULT_TIMEZONE.to_string(),
                currency: DEFAULT_CURRENCY.to_string(),
                ..ProfileForm::default()
            },
        })
    }

    /// Create or replace the profile
    pub async fn update(&self, form: &ProfileForm) -> FintrackResult<Profile> {
        form.validate()?;
        let user_id = self.storage.require_user()?;

        let update = ProfileUpdate {
            user_id,
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: non_blank(form.phone.as_deref()),
            timezone: form.timezone.trim().to_string(),
            currency: form.currency.trim().to_uppercase(),
        };
        let profile: Profile = self
            .storage
            .upsert_one(Collection::Profiles, &update, "user_id")
            .await?;
        info!(user = %user_id, "profile saved");
        self.storage.invalidate(&[ResourceKey::Profile]);
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{anonymous_storage, storage};

    fn form(name: &str) -> ProfileForm {
        ProfileForm {
            full_name: name.into(),
            email: "dana@example.com".into(),
            phone: None,
            timezone: "Europe/Berlin".into(),
            currency: "eur".into(),
        }
    }

    #[tokio::test]
    async fn test_first_update_creates_then_merges() {
        let storage = storage();
        let service = ProfileService::new(&storage);
        assert!(service.get().await.unwrap().is_none());

        let created = service.update(&form("Dana Reyes")).await.unwrap();
        assert_eq!(created.currency.as_deref(), Some("EUR"));

        let updated = service.update(&form("Dana R.")).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(storage.backend().row_count(Collection::Profiles), 1);

        let fetched = service.get().await.unwrap().unwrap();
        assert_eq!(fetched.display_name(), "Dana R.");
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let storage = storage();
        let service = ProfileService::new(&storage);
        let mut bad = form("Dana");
        bad.email = "not-an-email".into();

        let err = service.update(&bad).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(storage.backend().row_count(Collection::Profiles), 0);
    }

    #[tokio::test]
    async fn test_current_form_defaults() {
        let storage = storage();
        let service = ProfileService::new(&storage);
        let blank = service.current_form().await.unwrap();
        assert_eq!(blank.timezone, "UTC");
        assert_eq!(blank.currency, "USD");

        service.update(&form("Dana Reyes")).await.unwrap();
        let filled = service.current_form().await.unwrap();
        assert_eq!(filled.full_name, "Dana Reyes");
        assert_eq!(filled.timezone, "Europe/Berlin");
    }

    #[tokio::test]
    async fn test_requires_user() {
        let storage = anonymous_storage();
        let service = ProfileService::new(&storage);
        assert!(service.get().await.unwrap_err().is_auth());
    }
}
