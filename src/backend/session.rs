//! Signed-in session
//!
//! The backend owns authentication; fintrack only remembers who is signed
//! in (user id plus access token) between invocations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FintrackPaths;
use crate::error::FintrackResult;
use crate::models::UserId;
use crate::storage::file_io::{read_json_optional, remove_if_exists, write_json_atomic};

/// The current user's identity and credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub access_token: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Load the cached session, ignoring one that has expired
    pub fn load(paths: &FintrackPaths) -> FintrackResult<Option<Self>> {
        let session: Option<Session> = read_json_optional(paths.session_file())?;
        match session {
            Some(s) if s.is_expired(Utc::now()) => {
                debug!(user = %s.user_id, "cached session expired");
                Ok(None)
            }
            other => Ok(other),
        }
    }

    pub fn save(&self, paths: &FintrackPaths) -> FintrackResult<()> {
        write_json_atomic(paths.session_file(), self)
    }

    pub fn clear(paths: &FintrackPaths) -> FintrackResult<()> {
        remove_if_exists(paths.session_file())
    }
}

/// Source of the current user identity
pub trait SessionProvider: Send + Sync {
    /// The signed-in user, if any
    fn current_user(&self) -> Option<UserId>;

    /// Email of the signed-in user, if known
    fn email(&self) -> Option<String> {
        None
    }
}

/// A session fixed at startup
#[derive(Debug, Clone, Default)]
pub struct StaticSession(Option<Session>);

impl StaticSession {
    pub fn new(session: Option<Session>) -> Self {
        Self(session)
    }

    /// No user signed in
    pub fn anonymous() -> Self {
        Self(None)
    }

    /// A signed-in user with no real token, for tests and demo data
    pub fn for_user(user_id: UserId) -> Self {
        Self(Some(Session {
            user_id,
            access_token: String::new(),
            email: None,
            expires_at: None,
        }))
    }

    pub fn session(&self) -> Option<&Session> {
        self.0.as_ref()
    }
}

impl SessionProvider for StaticSession {
    fn current_user(&self) -> Option<UserId> {
        self.0.as_ref().map(|s| s.user_id)
    }

    fn email(&self) -> Option<String> {
        self.0.as_ref().and_then(|s| s.email.clone())
    }
}
