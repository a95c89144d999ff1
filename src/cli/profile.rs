//! Profile CLI commands

use clap::Subcommand;

use crate::backend::Backend;
use crate::display::dashboard::format_profile;
use crate::error::FintrackResult;
use crate::services::ProfileService;
use crate::storage::Storage;

/// Profile subcommands
#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show your profile
    Show,
    /// Update profile fields; unspecified fields keep their current value
    Update {
        /// Full name
        #[arg(short, long)]
        name: Option<String>,
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
        /// Phone number (pass "" to clear)
        #[arg(short, long)]
        phone: Option<String>,
        /// IANA timezone (e.g., "Europe/Berlin")
        #[arg(short, long)]
        timezone: Option<String>,
        /// ISO currency code
        #[arg(short, long)]
        currency: Option<String>,
    },
}

/// Handle a profile command
pub async fn handle_profile_command<B: Backend>(
    storage: &Storage<B>,
    cmd: ProfileCommands,
) -> FintrackResult<()> {
    let service = ProfileService::new(storage);

    match cmd {
        ProfileCommands::Show => match service.get().await? {
            Some(profile) => print!("{}", format_profile(&profile)),
            None => {
                println!("No profile saved yet.");
                println!("Run 'fintrack profile update --name <name>' to create one.");
            }
        },

        ProfileCommands::Update {
            name,
            email,
            phone,
            timezone,
            currency,
        } => {
            let mut form = service.current_form().await?;
            if let Some(name) = name {
                form.full_name = name;
            }
            if let Some(email) = email {
                form.email = email;
            }
            if let Some(phone) = phone {
                form.phone = Some(phone);
            }
            if let Some(timezone) = timezone {
                form.timezone = timezone;
            }
            if let Some(currency) = currency {
                form.currency = currency;
            }

            let profile = service.update(&form).await?;
            println!("Profile updated.");
            print!("{}", format_profile(&profile));
        }
    }

    Ok(())
}
