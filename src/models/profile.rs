//! User profile model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ProfileId, UserId};

/// A profile row, one per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Name to greet the user with
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or("User")
    }
}

/// Upsert payload for the profile; the backend merges on `user_id`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub user_id: UserId,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub timezone: String,
    pub currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallbacks() {
        let mut profile: Profile = serde_json::from_value(serde_json::json!({
            "id": "9f3c1d2e-0000-4000-8000-000000000001",
            "user_id": "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            "full_name": "Dana Reyes",
            "email": "dana@example.com"
        }))
        .unwrap();
        assert_eq!(profile.display_name(), "Dana Reyes");

        profile.full_name = Some(" ".into());
        assert_eq!(profile.display_name(), "dana@example.com");

        profile.email = None;
        assert_eq!(profile.display_name(), "User");
    }

    #[test]
    fn test_update_skips_missing_phone() {
        let update = ProfileUpdate {
            user_id: UserId::new(),
            full_name: "Dana".into(),
            email: "dana@example.com".into(),
            phone: None,
            timezone: "UTC".into(),
            currency: "USD".into(),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.get("phone").is_none());
        assert_eq!(json["timezone"], "UTC");
    }
}
