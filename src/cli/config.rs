//! Config CLI command
//!
//! Without flags, prints where fintrack keeps its files and the current
//! settings. Any flag given is written to the settings file.

use clap::Args;

use crate::backend::Session;
use crate::config::{FintrackPaths, Settings};
use crate::error::FintrackResult;
use crate::reports::DateRangePreset;
use crate::validation::ValidationErrors;

/// Show or change settings
#[derive(Args, Default)]
pub struct ConfigArgs {
    /// Base URL of the hosted project
    #[arg(long)]
    pub backend_url: Option<String>,
    /// Public anon key of the hosted project
    #[arg(long)]
    pub anon_key: Option<String>,
    /// Currency symbol used when printing amounts
    #[arg(long)]
    pub currency_symbol: Option<String>,
    /// Range used by reports when none is given
    #[arg(long)]
    pub default_range: Option<String>,
    /// Rows shown by `transaction recent`
    #[arg(long)]
    pub recent_limit: Option<usize>,
}

impl ConfigArgs {
    fn has_changes(&self) -> bool {
        self.backend_url.is_some()
            || self.anon_key.is_some()
            || self.currency_symbol.is_some()
            || self.default_range.is_some()
            || self.recent_limit.is_some()
    }

    /// Copy every given flag into `settings`
    pub fn apply(self, settings: &mut Settings) -> Result<(), ValidationErrors> {
        if let Some(range) = self.default_range {
            settings.default_range = DateRangePreset::parse(&range).ok_or_else(|| {
                ValidationErrors::single("default_range", format!("Unknown range '{}'.", range))
            })?;
        }
        if let Some(limit) = self.recent_limit {
            if limit == 0 {
                return Err(ValidationErrors::single(
                    "recent_limit",
                    "Recent limit must be at least 1.",
                ));
            }
            settings.recent_limit = limit;
        }
        if let Some(url) = self.backend_url {
            settings.backend_url = Some(url.trim().to_string());
        }
        if let Some(key) = self.anon_key {
            settings.anon_key = Some(key.trim().to_string());
        }
        if let Some(symbol) = self.currency_symbol {
            settings.currency_symbol = symbol;
        }
        Ok(())
    }
}

/// Handle the config command
pub fn handle_config_command(
    paths: &FintrackPaths,
    settings: &mut Settings,
    args: ConfigArgs,
) -> FintrackResult<()> {
    if args.has_changes() {
        args.apply(settings)?;
        settings.save(paths)?;
        println!("Settings saved to {}", paths.settings_file().display());
        println!();
    }

    let session = Session::load(paths)?;

    println!("fintrack Configuration");
    println!("======================");
    println!("Config directory: {}", paths.base_dir().display());
    println!("Settings file:    {}", paths.settings_file().display());
    println!();
    println!("Settings:");
    println!(
        "  Backend URL:     {}",
        settings.backend_url.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  Anon key:        {}",
        if settings.anon_key.is_some() { "(set)" } else { "(not set)" }
    );
    println!("  Currency symbol: {}", settings.currency_symbol);
    println!("  Default range:   {}", settings.default_range.as_str());
    println!("  Recent limit:    {}", settings.recent_limit);
    println!(
        "  Signed in:       {}",
        match &session {
            Some(s) => s.email.clone().unwrap_or_else(|| s.user_id.to_string()),
            None => "no".to_string(),
        }
    );
    Ok(())
}
