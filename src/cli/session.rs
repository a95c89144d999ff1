//! Sign-in and sign-out
//!
//! The session (user id and access token) is cached next to the settings
//! file and picked up by every later command.

use clap::Args;
use tracing::info;

use crate::backend::{RestBackend, Session};
use crate::config::{FintrackPaths, Settings};
use crate::error::{FintrackError, FintrackResult};

/// Environment variable read for the password when `--password` is absent
pub const PASSWORD_ENV: &str = "FINTRACK_PASSWORD";

/// Sign in with email and password
#[derive(Args)]
pub struct LoginArgs {
    /// Account email
    pub email: String,
    /// Password (prompted for when not given)
    #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: Option<String>,
}

/// Handle the login command
pub async fn handle_login_command(
    paths: &FintrackPaths,
    settings: &Settings,
    args: LoginArgs,
) -> FintrackResult<()> {
    let (url, key) = settings.connection()?;
    let password = match args.password {
        Some(password) => password,
        None => prompt_password("Password: ")?,
    };

    let session = RestBackend::new(url, key)?
        .sign_in(args.email.trim(), &password)
        .await?;
    paths.ensure_directories()?;
    session.save(paths)?;

    info!(user = %session.user_id, "session cached");
    println!(
        "Signed in as {}",
        session.email.as_deref().unwrap_or(args.email.trim())
    );
    Ok(())
}

/// Handle the logout command
pub fn handle_logout_command(paths: &FintrackPaths) -> FintrackResult<()> {
    let had_session = Session::load(paths)?.is_some();
    Session::clear(paths)?;
    if had_session {
        println!("Signed out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

fn prompt_password(prompt: &str) -> FintrackResult<String> {
    rpassword::prompt_password(prompt)
        .map_err(|e| FintrackError::Auth(format!("Failed to read password: {}", e)))
}
