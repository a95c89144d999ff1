//! Dashboard CLI command

use tracing::warn;

use crate::backend::Backend;
use crate::config::Settings;
use crate::display::dashboard::format_dashboard;
use crate::error::FintrackResult;
use crate::services::{DashboardService, ProfileService};
use crate::storage::Storage;

use super::today;

/// Print every dashboard section
///
/// Sections that fail to load are shown as unavailable; the command itself
/// only fails when there is no signed-in user.
pub async fn handle_dashboard_command<B: Backend>(
    storage: &Storage<B>,
    settings: &Settings,
) -> FintrackResult<()> {
    storage.require_user()?;

    let dashboard_service = DashboardService::new(storage);
    let profile_service = ProfileService::new(storage);
    let (dashboard, profile) = tokio::join!(
        dashboard_service.load(today()),
        profile_service.get(),
    );

    let profile = profile.unwrap_or_else(|err| {
        warn!(error = %err, "profile unavailable for greeting");
        None
    });
    let greeting = profile
        .as_ref()
        .map(|p| p.display_name().to_string())
        .or_else(|| storage.session().email());

    print!(
        "{}",
        format_dashboard(&dashboard, greeting.as_deref(), &settings.currency_symbol)
    );

    let failed = dashboard.failed_sections();
    if failed > 0 {
        warn!(failed, "dashboard rendered with unavailable sections");
    }
    Ok(())
}
