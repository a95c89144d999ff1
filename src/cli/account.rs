//! Account CLI commands
//!
//! Implements CLI commands for account management.

use clap::Subcommand;

use crate::backend::Backend;
use crate::config::Settings;
use crate::display::account::{format_account_details, format_account_list};
use crate::display::report::money;
use crate::error::FintrackResult;
use crate::models::account::DEFAULT_CURRENCY;
use crate::services::{AccountService, TransactionService};
use crate::storage::Storage;
use crate::validation::AccountForm;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Account type (bank, cash, e_wallet, credit_card, investment)
        #[arg(short = 't', long, default_value = "bank")]
        account_type: String,
        /// Opening balance (e.g., "1000.00" or "-250")
        #[arg(short, long, default_value = "0")]
        balance: String,
        /// ISO currency code
        #[arg(short, long, default_value = DEFAULT_CURRENCY)]
        currency: String,
        /// Free-form notes
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List active accounts
    List {
        /// Include deactivated accounts
        #[arg(short, long)]
        all: bool,
    },
    /// Show account details and its transactions
    Show {
        /// Account name or ID
        account: String,
    },
    /// Deactivate an account (its transactions are kept)
    Deactivate {
        /// Account name or ID
        account: String,
    },
}

/// Handle an account command
pub async fn handle_account_command<B: Backend>(
    storage: &Storage<B>,
    settings: &Settings,
    cmd: AccountCommands,
) -> FintrackResult<()> {
    let service = AccountService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        AccountCommands::Create {
            name,
            account_type,
            balance,
            currency,
            description,
        } => {
            let form = AccountForm {
                name,
                account_type,
                balance,
                currency,
                description,
            };
            let account = service.create(&form).await?;

            println!("Created account: {}", account.name);
            println!("  Type: {}", account.account_type);
            println!("  Balance: {}", money(account.balance, symbol));
            println!("  Currency: {}", account.currency());
            println!("  ID: {}", account.id);
        }

        AccountCommands::List { all } => {
            let accounts = if all {
                service.list_all().await?
            } else {
                service.list().await?
            };
            print!("{}", format_account_list(&accounts, symbol));
        }

        AccountCommands::Show { account } => {
            let found = service.resolve(&account).await?;
            let transactions = TransactionService::new(storage)
                .for_account(&found.name)
                .await?;
            print!("{}", format_account_details(&found, &transactions, symbol));
        }

        AccountCommands::Deactivate { account } => {
            let deactivated = service.deactivate(&account).await?;
            println!("Deactivated account: {}", deactivated.name);
        }
    }

    Ok(())
}
