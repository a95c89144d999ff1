//! User settings for fintrack
//!
//! Connection details for the hosted backend plus display preferences.
//! Connection values can be overridden from the environment, which takes
//! precedence over the file.

use serde::{Deserialize, Serialize};

use super::paths::FintrackPaths;
use crate::error::FintrackError;
use crate::reports::range::DateRangePreset;
use crate::storage::file_io::{read_json, write_json_atomic};

pub const BACKEND_URL_ENV: &str = "FINTRACK_BACKEND_URL";
pub const ANON_KEY_ENV: &str = "FINTRACK_ANON_KEY";

/// User settings for fintrack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Base URL of the hosted project (e.g. `https://xyz.supabase.co`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,

    /// Public anon key sent as `apikey` on every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,

    /// Currency symbol used when formatting amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Range used by reports when none is given
    #[serde(default)]
    pub default_range: DateRangePreset,

    /// Number of rows in the "recent transactions" list
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_recent_limit() -> usize {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backend_url: None,
            anon_key: None,
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            default_range: DateRangePreset::default(),
            recent_limit: default_recent_limit(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    ///
    /// Environment overrides are applied on top.
    pub fn load_or_create(paths: &FintrackPaths) -> Result<Self, FintrackError> {
        let mut settings: Settings = read_json(paths.settings_file())
            .map_err(|e| FintrackError::Config(format!("Failed to load settings: {}", e)))?;
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FintrackPaths) -> Result<(), FintrackError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Replace connection values with any set in the environment
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = non_empty_env(BACKEND_URL_ENV) {
            self.backend_url = Some(url);
        }
        if let Some(key) = non_empty_env(ANON_KEY_ENV) {
            self.anon_key = Some(key);
        }
    }

    /// Backend URL and anon key, or a config error naming what is missing
    pub fn connection(&self) -> Result<(&str, &str), FintrackError> {
        let url = self.backend_url.as_deref().ok_or_else(|| {
            FintrackError::Config(format!(
                "No backend URL configured. Run `fintrack config --backend-url <url>` or set {}",
                BACKEND_URL_ENV
            ))
        })?;
        let key = self.anon_key.as_deref().ok_or_else(|| {
            FintrackError::Config(format!(
                "No anon key configured. Run `fintrack config --anon-key <key>` or set {}",
                ANON_KEY_ENV
            ))
        })?;
        Ok((url, key))
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.recent_limit, 5);
        assert_eq!(settings.default_range, DateRangePreset::Last30Days);
        assert!(settings.backend_url.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            backend_url: Some("https://demo.supabase.co".into()),
            anon_key: Some("anon".into()),
            default_range: DateRangePreset::ThisYear,
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let mut loaded: Settings = read_json(paths.settings_file()).unwrap();
        loaded.apply_env_overrides();
        assert_eq!(loaded.default_range, DateRangePreset::ThisYear);
        assert!(loaded.backend_url.is_some());
    }

    #[test]
    fn test_missing_connection_is_config_error() {
        let settings = Settings::default();
        let err = settings.connection().unwrap_err();
        assert!(matches!(err, FintrackError::Config(_)));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"recent_limit": 10}"#).unwrap();
        assert_eq!(settings.recent_limit, 10);
        assert_eq!(settings.currency_symbol, "$");
    }
}
