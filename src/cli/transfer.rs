//! Transfer CLI command

use clap::Args;

use crate::backend::Backend;
use crate::config::Settings;
use crate::display::report::money;
use crate::error::FintrackResult;
use crate::services::TransferService;
use crate::storage::Storage;
use crate::validation::TransferForm;

use super::today;

/// Move money between two accounts
#[derive(Args)]
pub struct TransferArgs {
    /// Amount to move (e.g., "250.00")
    pub amount: String,
    /// Source account name or ID
    #[arg(short, long)]
    pub from: String,
    /// Destination account name or ID
    #[arg(short, long)]
    pub to: String,
    /// What the transfer is for
    #[arg(short, long, default_value = "Transfer")]
    pub description: String,
    /// Date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,
}

/// Handle the transfer command
pub async fn handle_transfer_command<B: Backend>(
    storage: &Storage<B>,
    settings: &Settings,
    args: TransferArgs,
) -> FintrackResult<()> {
    let form = TransferForm {
        description: args.description,
        amount: args.amount,
        from_account: args.from.clone(),
        to_account: args.to.clone(),
        date: args.date,
    };

    let result = TransferService::new(storage)
        .transfer(&form, today())
        .await?;

    println!(
        "Transferred {} from {} to {}",
        money(result.amount(), &settings.currency_symbol),
        args.from,
        args.to
    );
    println!("  Outgoing: {}", result.outgoing.id);
    println!("  Incoming: {}", result.incoming.id);
    Ok(())
}
